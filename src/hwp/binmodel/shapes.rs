//! Drawing object components.

use super::ModelType;
use super::bodytext::MARGIN;
use super::docinfo::{FILL_COLOR_PATTERN, FILL_GRADATION, FILL_IMAGE};
use super::field::ContentType;
use super::field::dsl::*;
use crate::common::Version;
use crate::hwp::dataio::{BitField, BitLayout};

pub static COORD: &[Field] = &[shwpunit("x"), shwpunit("y")];

/// 3x2 affine matrix of six little-endian doubles
const MATRIX: usize = 48;

static SCALE_ROTATION: &[Field] = &[bytes("scaler", MATRIX), bytes("rotator", MATRIX)];

pub static SHAPE_COMPONENT_FLAGS: BitLayout = BitLayout {
    name: "ShapeComponent.Flags",
    fields: &[BitField::flag("flip_horizontal", 0), BitField::flag("flip_vertical", 1)],
};

pub static SHAPE_FILL_FLAGS: BitLayout = BitLayout {
    name: "ShapeComponent.FillFlags",
    fields: &[
        BitField::flag("fill_colorpattern", 8),
        BitField::flag("fill_image", 9),
        BitField::flag("fill_gradation", 10),
    ],
};

pub static BORDER_LINE: &[Field] = &[color("color"), i32("width"), u32("flags")];

/// Control ids of components that draw something themselves
const DRAWN: &[&str] = &["$lin", "$rec", "$ell", "$arc", "$pol", "$cur", "$pic", "$ole", "$tat", "eqed"];

static LINE_AND_FILL: &[Field] = &[
    structure("border", BORDER_LINE),
    flags("fill_flags", Prim::U16, &SHAPE_FILL_FLAGS),
    u16("unknown"),
    u8("unknown1"),
    structure("fill_colorpattern", FILL_COLOR_PATTERN).when(flag_set("fill_flags", "fill_colorpattern")),
    structure("fill_gradation", FILL_GRADATION).when(flag_set("fill_flags", "fill_gradation")),
    structure("fill_image", FILL_IMAGE).when(flag_set("fill_flags", "fill_image")),
    u32("fill_shape"),
    u8("fill_blur_center").when(flag_set("fill_flags", "fill_gradation")),
    bytes("unknown2", 5).since(Version::new(5, 0, 2, 4)),
    bytes("unknown3", 16).since(Version::new(5, 0, 2, 4)),
];

pub static SHAPE_COMPONENT: ContentType = ContentType::new(
    "ShapeComponent",
    &[
        chid("chid0").when(Condition::ParentIs(ModelType::GShapeObjectControl)),
        chid("chid"),
        shwpunit("x_in_group"),
        shwpunit("y_in_group"),
        u16("level_in_group"),
        u16("local_version"),
        shwpunit("initial_width"),
        shwpunit("initial_height"),
        shwpunit("width"),
        shwpunit("height"),
        flags("flags", Prim::U32, &SHAPE_COMPONENT_FLAGS),
        u16("angle"),
        structure("rotation_center", COORD),
        u16("scalerotations_count"),
        bytes("translation", MATRIX),
        array(
            "scalerotations",
            &FieldKind::Struct(SCALE_ROTATION),
            Count::Field("scalerotations_count"),
        ),
        array("controls", &FieldKind::Prim(Prim::Chid), Count::Prefixed(Prim::U16)).when(Condition::StrIn {
            field: "chid",
            values: &["$con"],
        }),
        inline(LINE_AND_FILL).when(Condition::StrIn {
            field: "chid",
            values: DRAWN,
        }),
    ],
);

pub static SHAPE_LINE: ContentType = ContentType::new(
    "ShapeLine",
    &[structure("p0", COORD), structure("p1", COORD), u16("attr")],
);

pub static SHAPE_RECTANGLE: ContentType = ContentType::new(
    "ShapeRectangle",
    &[
        u8("round"),
        structure("p0", COORD),
        structure("p1", COORD),
        structure("p2", COORD),
        structure("p3", COORD),
    ],
);

pub static SHAPE_ELLIPSE: ContentType = ContentType::new(
    "ShapeEllipse",
    &[
        u32("flags"),
        structure("center", COORD),
        structure("axis1", COORD),
        structure("axis2", COORD),
        structure("start", COORD),
        structure("end", COORD),
        structure("start2", COORD),
        structure("end2", COORD),
    ],
);

pub static SHAPE_ARC: ContentType = ContentType::new(
    "ShapeArc",
    &[
        structure("center", COORD),
        structure("axis1", COORD),
        structure("axis2", COORD),
    ],
);

pub static SHAPE_POLYGON: ContentType = ContentType::new(
    "ShapePolygon",
    &[array("points", &FieldKind::Struct(COORD), Count::Prefixed(Prim::U16))],
);

pub static SHAPE_CURVE: ContentType = ContentType::new(
    "ShapeCurve",
    &[
        u16("count"),
        array("points", &FieldKind::Struct(COORD), Count::Field("count")),
        array("segments_flags", &FieldKind::Prim(Prim::U8), Count::ToEnd),
    ],
);

pub static SHAPE_OLE: ContentType = ContentType::new(
    "ShapeOLE",
    &[
        u32("flags"),
        i32("extent_x"),
        i32("extent_y"),
        u16("storage_id"),
        structure("border", BORDER_LINE),
    ],
);

static PICTURE_RECT: &[Field] = &[
    structure("p0", COORD),
    structure("p1", COORD),
    structure("p2", COORD),
    structure("p3", COORD),
];

static PICTURE_CLIP: &[Field] = &[i32("left"), i32("top"), i32("right"), i32("bottom")];

pub static SHAPE_PICTURE: ContentType = ContentType::new(
    "ShapePicture",
    &[
        structure("border", BORDER_LINE),
        structure("rect", PICTURE_RECT),
        structure("clip", PICTURE_CLIP),
        structure("padding", MARGIN),
        structure("picture", FILL_IMAGE),
        u8("border_opacity").since(Version::new(5, 0, 2, 5)),
        u32("instance_id").since(Version::new(5, 0, 2, 5)),
    ],
);

pub static SHAPE_CONTAINER: ContentType = ContentType::new("ShapeContainer", &[]);

pub static SHAPE_TEXT_ART: ContentType = ContentType::new("ShapeTextArt", &[]);

#[cfg(test)]
mod tests {
    use crate::common::Version;
    use crate::hwp::binmodel::{Model, ModelType, Parent, parse_model};
    use crate::hwp::consts::HwpTag;
    use crate::hwp::record::Record;

    const VERSION: Version = Version::new(5, 0, 1, 7);

    /// Component header up to and including one scale/rotation pair
    fn component_header(chid: &[u8; 4]) -> Vec<u8> {
        let mut payload = chid.to_vec();
        payload.extend_from_slice(&[0; 8]);
        payload.extend_from_slice(&1u16.to_le_bytes());
        payload.extend_from_slice(&1u16.to_le_bytes());
        for size in [1000i32, 500, 1000, 500] {
            payload.extend_from_slice(&size.to_le_bytes());
        }
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes());
        payload.extend_from_slice(&[0; 8]);
        payload.extend_from_slice(&1u16.to_le_bytes());
        payload.extend_from_slice(&[0; 48 + 96]);
        payload
    }

    fn gso() -> Model {
        let record = Record::new(HwpTag::CtrlHeader as u16, 1, &b" osg"[..]);
        parse_model(VERSION, &record, None).unwrap()
    }

    #[test]
    fn test_rectangle_under_gso() {
        let mut payload = b"cer$".to_vec();
        payload.extend(component_header(b"cer$"));
        payload.extend_from_slice(&[0; 12]);
        payload.extend_from_slice(&0x0100u16.to_le_bytes());
        payload.extend_from_slice(&[0, 0, 0]);
        payload.extend_from_slice(&0xffffffu32.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&u32::MAX.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());

        let parent = gso();
        assert_eq!(parent.model_type, ModelType::GShapeObjectControl);
        let mut state = parent.model_type.initial_state();
        let record = Record::new(HwpTag::ShapeComponent as u16, 2, payload);
        let model = parse_model(VERSION, &record, Some(Parent::new(&parent, &mut state))).unwrap();

        let content = &model.content;
        assert_eq!(content.str("chid0"), Some("$rec"));
        assert_eq!(content.str("chid"), Some("$rec"));
        assert_eq!(content.int("width"), Some(1000));
        assert_eq!(content.list("scalerotations").map(<[_]>::len), Some(1));
        assert!(content.flags("fill_flags").unwrap().is_set("fill_colorpattern").unwrap());
        let pattern = content.get_struct("fill_colorpattern").unwrap();
        assert_eq!(pattern.int("background_color"), Some(0xffffff));
        assert!(!content.contains("fill_gradation"));
        assert_eq!(content.int("fill_shape"), Some(0));
        assert!(!content.contains("controls"));
        assert!(model.unparsed.is_empty());
    }

    #[test]
    fn test_colorpattern_and_gradation_fill() {
        let mut payload = b"cer$".to_vec();
        payload.extend(component_header(b"cer$"));
        payload.extend_from_slice(&[0; 12]);
        payload.extend_from_slice(&1280u16.to_le_bytes());
        payload.extend_from_slice(&[0, 0, 0]);
        // colour pattern
        payload.extend_from_slice(&0xffffffu32.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&u32::MAX.to_le_bytes());
        // gradation
        payload.push(1);
        for n in [180u32, 0, 100, 50, 2, 64512, 13171936] {
            payload.extend_from_slice(&n.to_le_bytes());
        }
        payload.extend_from_slice(&1u32.to_le_bytes());
        payload.push(50);

        let parent = gso();
        for version in [Version::new(5, 0, 0, 5), Version::new(5, 0, 1, 7)] {
            let mut state = parent.model_type.initial_state();
            let record = Record::new(HwpTag::ShapeComponent as u16, 2, payload.clone());
            let model = parse_model(version, &record, Some(Parent::new(&parent, &mut state))).unwrap();

            let content = &model.content;
            let fill_flags = content.flags("fill_flags").unwrap();
            assert!(fill_flags.is_set("fill_colorpattern").unwrap());
            assert!(fill_flags.is_set("fill_gradation").unwrap());
            assert!(!fill_flags.is_set("fill_image").unwrap());
            assert_eq!(
                content.get_struct("fill_colorpattern").unwrap().int("background_color"),
                Some(0xffffff)
            );

            let gradation = content.get_struct("fill_gradation").unwrap();
            assert_eq!(gradation.int("shear"), Some(180));
            assert_eq!(gradation.int("blur"), Some(50));
            let center = gradation.get_struct("center").unwrap();
            assert_eq!((center.int("x"), center.int("y")), (Some(0), Some(100)));
            let colors: Vec<_> = gradation
                .list("colors")
                .unwrap()
                .iter()
                .filter_map(|v| v.as_int())
                .collect();
            assert_eq!(colors, [64512, 13171936]);

            assert!(!content.contains("fill_image"));
            assert_eq!(content.int("fill_shape"), Some(1));
            assert_eq!(content.int("fill_blur_center"), Some(50));
            assert!(model.unparsed.is_empty());
        }
    }

    #[test]
    fn test_container_lists_children() {
        let mut payload = component_header(b"noc$");
        payload.extend_from_slice(&2u16.to_le_bytes());
        payload.extend_from_slice(b"cer$lle$");
        let record = Record::new(HwpTag::ShapeComponent as u16, 2, payload);
        let model = parse_model(VERSION, &record, None).unwrap();

        let content = &model.content;
        assert!(!content.contains("chid0"));
        let controls: Vec<_> = content
            .list("controls")
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(controls, ["$rec", "$ell"]);
        assert!(!content.contains("fill_flags"));
        assert!(model.unparsed.is_empty());
    }

    #[test]
    fn test_textbox_list_header() {
        let mut payload = component_header(b"cer$");
        payload.extend_from_slice(&[0; 12 + 2 + 3 + 4]);
        let record = Record::new(HwpTag::ShapeComponent as u16, 2, payload);
        let shape = parse_model(VERSION, &record, None).unwrap();
        assert!(shape.unparsed.is_empty());

        let mut payload = vec![1, 0, 0, 0, 0, 0, 0, 0];
        for side in [141i16, 141, 141, 141] {
            payload.extend_from_slice(&side.to_le_bytes());
        }
        payload.extend_from_slice(&9000u32.to_le_bytes());
        let record = Record::new(HwpTag::ListHeader as u16, 3, payload);
        let mut state = shape.model_type.initial_state();
        let model = parse_model(VERSION, &record, Some(Parent::new(&shape, &mut state))).unwrap();
        assert_eq!(model.model_type, ModelType::TextboxParagraphList);
        assert_eq!(model.content.int("maxwidth"), Some(9000));
        assert_eq!(model.content.get_struct("padding").unwrap().int("top"), Some(141));
    }

    #[test]
    fn test_polygon_points() {
        let mut payload = 2u16.to_le_bytes().to_vec();
        for n in [0i32, 0, 100, -50] {
            payload.extend_from_slice(&n.to_le_bytes());
        }
        let record = Record::new(HwpTag::ShapeComponentPolygon as u16, 3, payload);
        let model = parse_model(VERSION, &record, None).unwrap();
        let points = model.content.list("points").unwrap();
        assert_eq!(points[1].as_struct().unwrap().int("y"), Some(-50));
    }
}
