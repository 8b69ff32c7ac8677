//! Content types of the `DocInfo` stream.

use super::field::dsl::*;
use super::field::ContentType;
use crate::common::Version;
use crate::hwp::dataio::{BitField, BitLayout, EnumTable};

pub static DOCUMENT_PROPERTIES: ContentType = ContentType::new(
    "DocumentProperties",
    &[
        u16("section_count"),
        u16("page_startnum"),
        u16("footnote_startnum"),
        u16("endnote_startnum"),
        u16("picture_startnum"),
        u16("table_startnum"),
        u16("math_startnum"),
        u32("list_id"),
        u32("paragraph_id"),
        u32("character_unit_loc_in_paragraph"),
    ],
);

/// Font counts per language, in the order face names are stored
pub const LANGUAGE_FONT_COUNTS: [&str; 7] = [
    "ko_fonts",
    "en_fonts",
    "cn_fonts",
    "jp_fonts",
    "other_fonts",
    "symbol_fonts",
    "user_fonts",
];

pub static ID_MAPPINGS: ContentType = ContentType::new(
    "IdMappings",
    &[
        u32("bindata"),
        u32("ko_fonts"),
        u32("en_fonts"),
        u32("cn_fonts"),
        u32("jp_fonts"),
        u32("other_fonts"),
        u32("symbol_fonts"),
        u32("user_fonts"),
        u32("borderfills"),
        u32("charshapes"),
        u32("tabdefs"),
        u32("numberings"),
        u32("bullets"),
        u32("parashapes"),
        u32("styles"),
        u32("memoshapes").since(Version::new(5, 0, 2, 1)),
        u32("trackchanges").since(Version::new(5, 0, 3, 2)),
        u32("trackchange_authors").since(Version::new(5, 0, 3, 2)),
    ],
);

pub static BIN_STORAGE: EnumTable = EnumTable {
    name: "BinData.StorageType",
    items: &[("LINK", 0), ("EMBEDDING", 1), ("STORAGE", 2)],
};

pub static BIN_COMPRESSION: EnumTable = EnumTable {
    name: "BinData.CompressionType",
    items: &[("STORAGE_DEFAULT", 0), ("YES", 1), ("NO", 2)],
};

pub static BIN_ACCESS: EnumTable = EnumTable {
    name: "BinData.AccessState",
    items: &[("NEVER", 0), ("OK", 1), ("FAILED", 2), ("FAILED_IGNORED", 3)],
};

pub static BIN_DATA_FLAGS: BitLayout = BitLayout {
    name: "BinData.Flags",
    fields: &[
        BitField::enumerated("storage", 0, 3, &BIN_STORAGE),
        BitField::enumerated("compression", 4, 5, &BIN_COMPRESSION),
        BitField::enumerated("access", 8, 9, &BIN_ACCESS),
    ],
};

pub static BIN_DATA: ContentType = ContentType::new(
    "BinData",
    &[
        flags("flags", Prim::U16, &BIN_DATA_FLAGS),
        Field::new(
            "bindata",
            FieldKind::Select {
                field: "flags",
                bits: "storage",
                cases: &[
                    (0, &[bstr("abspath"), bstr("relpath")]),
                    (1, &[u16("storage_id"), bstr("ext")]),
                    (2, &[u16("storage_id")]),
                ],
            },
        ),
    ],
);

pub static FONT_FILE_TYPE: EnumTable = EnumTable {
    name: "FaceName.FontFileType",
    items: &[("UNKNOWN", 0), ("TTF", 1), ("HFT", 2)],
};

pub static FACE_NAME_FLAGS: BitLayout = BitLayout {
    name: "FaceName.Flags",
    fields: &[
        BitField::enumerated("font_file_type", 0, 1, &FONT_FILE_TYPE),
        BitField::flag("default", 5),
        BitField::flag("metric", 6),
        BitField::flag("alternate", 7),
    ],
};

static PANOSE1: &[Field] = &[
    u8("family_type"),
    u8("serif_style"),
    u8("weight"),
    u8("proportion"),
    u8("contrast"),
    u8("stroke_variation"),
    u8("arm_style"),
    u8("letterform"),
    u8("midline"),
    u8("x_height"),
];

pub static FACE_NAME: ContentType = ContentType::new(
    "FaceName",
    &[
        flags("flags", Prim::U8, &FACE_NAME_FLAGS),
        bstr("name"),
        u8("alternate_fonttype").when(flag_set("flags", "alternate")),
        bstr("alternate_fontname").when(flag_set("flags", "alternate")),
        structure("panose1", PANOSE1).when(flag_set("flags", "metric")),
        bstr("default_fontname").when(flag_set("flags", "default")),
    ],
);

pub static STROKE_TYPE: EnumTable = EnumTable {
    name: "StrokeType",
    items: &[
        ("NONE", 0),
        ("SOLID", 1),
        ("DASHED", 2),
        ("DOTTED", 3),
        ("DASH_DOT", 4),
        ("DASH_DOT_DOT", 5),
        ("LONG_DASH", 6),
        ("LARGE_DOT", 7),
        ("DOUBLE", 8),
        ("DOUBLE_2", 9),
        ("DOUBLE_3", 10),
        ("TRIPLE", 11),
        ("WAVE", 12),
        ("DOUBLE_WAVE", 13),
        ("THICK_3D", 14),
        ("THICK_3D_REVERSE_LIGHTING", 15),
        ("SOLID_3D", 16),
        ("SOLID_3D_REVERSE_LIGHTING", 17),
    ],
};

/// One border line: stroke, width and colour
pub static BORDER: &[Field] = &[
    enumerated("stroke_flags", Prim::U8, &STROKE_TYPE),
    u8("width"),
    color("color"),
];

pub static BORDER_FLAGS: BitLayout = BitLayout {
    name: "BorderFill.BorderFlags",
    fields: &[
        BitField::flag("effect_3d", 0),
        BitField::flag("effect_shadow", 1),
        BitField::bits("slash", 2, 4),
        BitField::bits("backslash", 5, 7),
    ],
};

pub static FILL_FLAGS: BitLayout = BitLayout {
    name: "BorderFill.FillFlags",
    fields: &[
        BitField::flag("colorpattern", 0),
        BitField::flag("image", 1),
        BitField::flag("gradation", 2),
    ],
};

pub static FILL_COLOR_PATTERN: &[Field] = &[
    color("background_color"),
    color("pattern_color"),
    u32("pattern_type_flags"),
];

pub static COORD32: &[Field] = &[u32("x"), u32("y")];

pub static FILL_GRADATION: &[Field] = &[
    u8("type"),
    u32("shear"),
    structure("center", COORD32),
    u32("blur"),
    array("colors", &FieldKind::Prim(Prim::ColorRef), Count::Prefixed(Prim::U32)),
];

pub static FILL_IMAGE: &[Field] = &[
    u8("flags"),
    i8("brightness"),
    i8("contrast"),
    u8("effect"),
    u16("bindata_id"),
];

pub static BORDER_FILL: ContentType = ContentType::new(
    "BorderFill",
    &[
        flags("borderflags", Prim::U16, &BORDER_FLAGS),
        structure("left", BORDER),
        structure("right", BORDER),
        structure("top", BORDER),
        structure("bottom", BORDER),
        structure("diagonal", BORDER),
        flags("fillflags", Prim::U32, &FILL_FLAGS),
        structure("fill_colorpattern", FILL_COLOR_PATTERN).when(flag_set("fillflags", "colorpattern")),
        structure("fill_gradation", FILL_GRADATION).when(flag_set("fillflags", "gradation")),
        structure("fill_image", FILL_IMAGE).when(flag_set("fillflags", "image")),
        u32("fill_shape"),
        u8("fill_blur_center").when(flag_set("fillflags", "gradation")),
    ],
);

macro_rules! language_fields {
    ($ctor:ident) => {
        &[
            $ctor("ko"),
            $ctor("en"),
            $ctor("cn"),
            $ctor("jp"),
            $ctor("other"),
            $ctor("symbol"),
            $ctor("user"),
        ]
    };
}

/// Per-language values, in face name order
pub static LANGUAGE_U16: &[Field] = language_fields!(u16);
static LANGUAGE_U8: &[Field] = language_fields!(u8);
static LANGUAGE_I8: &[Field] = language_fields!(i8);

pub static UNDERLINE: EnumTable = EnumTable {
    name: "CharShape.Underline",
    items: &[("NONE", 0), ("UNDERLINE", 1), ("UNKNOWN", 2), ("UPPERLINE", 3)],
};

pub static CHAR_SHAPE_FLAGS: BitLayout = BitLayout {
    name: "CharShape.Flags",
    fields: &[
        BitField::flag("italic", 0),
        BitField::flag("bold", 1),
        BitField::enumerated("underline", 2, 3, &UNDERLINE),
        BitField::enumerated("underline_style", 4, 7, &STROKE_TYPE),
        BitField::bits("outline", 8, 10),
        BitField::bits("shadow", 11, 12),
        BitField::flag("emboss", 13),
        BitField::flag("engrave", 14),
        BitField::flag("superscript", 15),
        BitField::flag("subscript", 16),
        BitField::bits("strikethrough", 18, 20),
        BitField::bits("emphasis", 21, 24),
        BitField::flag("kerning", 30),
    ],
};

pub static CHAR_SHAPE: ContentType = ContentType::new(
    "CharShape",
    &[
        structure("font_ids", LANGUAGE_U16),
        structure("letter_width_expansion", LANGUAGE_U8),
        structure("letter_spacing", LANGUAGE_I8),
        structure("relative_size", LANGUAGE_U8),
        structure("position", LANGUAGE_I8),
        i32("basesize"),
        flags("charshapeflags", Prim::U32, &CHAR_SHAPE_FLAGS),
        i8("shadow_x"),
        i8("shadow_y"),
        color("text_color"),
        color("underline_color"),
        color("shade_color"),
        color("shadow_color"),
        u16("borderfill_id").since(Version::new(5, 0, 2, 1)),
        color("strikeout_color").since(Version::new(5, 0, 3, 0)),
    ],
);

static TAB_ITEM: &[Field] = &[hwpunit("pos"), u8("kind"), u8("fill_type"), u16("unknown")];

pub static TAB_DEF_FLAGS: BitLayout = BitLayout {
    name: "TabDef.Flags",
    fields: &[
        BitField::flag("autotab_left", 0),
        BitField::flag("autotab_right", 1),
    ],
};

pub static TAB_DEF: ContentType = ContentType::new(
    "TabDef",
    &[
        flags("flags", Prim::U32, &TAB_DEF_FLAGS),
        array("tabs", &FieldKind::Struct(TAB_ITEM), Count::Prefixed(Prim::U32)),
    ],
);

pub static PARAGRAPH_HEAD_FLAGS: BitLayout = BitLayout {
    name: "ParagraphHead.Flags",
    fields: &[
        BitField::bits("align", 0, 1),
        BitField::flag("instance_width", 2),
        BitField::flag("auto_indent", 3),
        BitField::bits("distance_type", 4, 4),
    ],
};

static PARAGRAPH_HEAD: &[Field] = &[
    flags("flags", Prim::U32, &PARAGRAPH_HEAD_FLAGS),
    hwpunit16("width_correction"),
    hwpunit16("distance_to_body"),
    u32("charshape_id"),
];

static NUMBERING_LEVEL: &[Field] = &[
    Field::new("paragraph_head", FieldKind::Inline(PARAGRAPH_HEAD)),
    bstr("numbering_format"),
];

pub static NUMBERING: ContentType = ContentType::new(
    "Numbering",
    &[
        array("levels", &FieldKind::Struct(NUMBERING_LEVEL), Count::Fixed(7)),
        u16("starting_number").since(Version::new(5, 0, 2, 5)),
    ],
);

pub static BULLET: ContentType = ContentType::new(
    "Bullet",
    &[inline(PARAGRAPH_HEAD), wchar("bullet_char")],
);

pub static PARA_SHAPE_FLAGS: BitLayout = BitLayout {
    name: "ParaShape.Flags",
    fields: &[
        BitField::bits("linespacing_type", 0, 1),
        BitField::bits("align", 2, 4),
        BitField::bits("linebreak_alphabet", 5, 6),
        BitField::flag("linebreak_hangul", 7),
        BitField::flag("use_paper_grid", 8),
        BitField::bits("minimum_space", 9, 15),
        BitField::flag("protect_single_line", 16),
        BitField::flag("with_next_paragraph", 17),
        BitField::flag("protect", 18),
        BitField::flag("start_new_page", 19),
        BitField::bits("valign", 20, 21),
        BitField::flag("lineheight_along_fontsize", 22),
        BitField::bits("head_shape", 23, 24),
        BitField::bits("level", 25, 27),
        BitField::flag("linked_border", 28),
        BitField::flag("ignore_margin", 29),
        BitField::flag("tail_shape", 30),
    ],
};

pub static PARA_SHAPE: ContentType = ContentType::new(
    "ParaShape",
    &[
        flags("parashapeflags", Prim::U32, &PARA_SHAPE_FLAGS),
        i32("doubled_margin_left"),
        i32("doubled_margin_right"),
        shwpunit("indent"),
        i32("doubled_margin_top"),
        i32("doubled_margin_bottom"),
        shwpunit("linespacing_before_5_0_2_5"),
        u16("tabdef_id"),
        u16("numbering_bullet_id"),
        u16("borderfill_id"),
        hwpunit16("border_left"),
        hwpunit16("border_right"),
        hwpunit16("border_top"),
        hwpunit16("border_bottom"),
        u32("flags2").since(Version::new(5, 0, 1, 7)),
        u32("flags3").since(Version::new(5, 0, 2, 5)),
        u32("linespacing").since(Version::new(5, 0, 2, 5)),
    ],
);

pub static STYLE_KIND: EnumTable = EnumTable {
    name: "Style.Kind",
    items: &[("PARAGRAPH", 0), ("CHAR", 1)],
};

pub static STYLE_FLAGS: BitLayout = BitLayout {
    name: "Style.Flags",
    fields: &[BitField::enumerated("kind", 0, 2, &STYLE_KIND)],
};

pub static STYLE: ContentType = ContentType::new(
    "Style",
    &[
        bstr("local_name"),
        bstr("name"),
        flags("flags", Prim::U8, &STYLE_FLAGS),
        u8("next_style_id"),
        i16("lang_id"),
        u16("parashape_id"),
        u16("charshape_id"),
        u16("unknown"),
    ],
);

/// Parameter sets; decoded opaque
pub static DOC_DATA: ContentType = ContentType::new("DocData", &[]);

pub static DISTRIBUTE_DOC_DATA: ContentType = ContentType::new("DistributeDocData", &[bytes("data", 256)]);

pub static COMPATIBLE_TARGET: EnumTable = EnumTable {
    name: "CompatibleDocument.Target",
    items: &[("DEFAULT", 0), ("HWP2007", 1), ("MSWORD", 2)],
};

pub static COMPATIBLE_DOCUMENT: ContentType = ContentType::new(
    "CompatibleDocument",
    &[enumerated("target", Prim::U32, &COMPATIBLE_TARGET)],
);

pub static LAYOUT_COMPATIBILITY: ContentType = ContentType::new(
    "LayoutCompatibility",
    &[
        u32("char"),
        u32("paragraph"),
        u32("section"),
        u32("object"),
        u32("field"),
    ],
);

pub static FORBIDDEN_CHAR: ContentType = ContentType::new("ForbiddenChar", &[]);

#[cfg(test)]
mod tests {
    use crate::common::Version;
    use crate::hwp::binmodel::{ModelType, parse_model};
    use crate::hwp::consts::HwpTag;
    use crate::hwp::fixtures::BIN_DATA;
    use crate::hwp::record::{Record, read_records};

    fn utf16(s: &str) -> Vec<u8> {
        let mut out = (s.encode_utf16().count() as u16).to_le_bytes().to_vec();
        for unit in s.encode_utf16() {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_bin_data_embedding() {
        let record = read_records(BIN_DATA).unwrap().remove(0);
        let model = parse_model(Version::new(5, 0, 1, 7), &record, None).unwrap();
        assert_eq!(model.model_type, ModelType::BinData);

        let flags = model.content.flags("flags").unwrap();
        assert!(flags.enum_value("storage").unwrap().is("EMBEDDING").unwrap());
        assert_eq!(flags.enum_value("compression").unwrap().name(), Some("STORAGE_DEFAULT"));

        let bindata = model.content.get_struct("bindata").unwrap();
        assert_eq!(bindata.int("storage_id"), Some(2));
        assert_eq!(bindata.str("ext"), Some("jpg"));
        assert!(model.unparsed.is_empty());
    }

    #[test]
    fn test_bin_data_link() {
        let mut payload = vec![0x00, 0x00];
        payload.extend(utf16("C:\\a.png"));
        payload.extend(utf16("a.png"));
        let record = Record::new(HwpTag::BinData as u16, 1, payload);
        let model = parse_model(Version::new(5, 0, 1, 7), &record, None).unwrap();
        let bindata = model.content.get_struct("bindata").unwrap();
        assert_eq!(bindata.str("abspath"), Some("C:\\a.png"));
        assert_eq!(bindata.str("relpath"), Some("a.png"));
    }

    #[test]
    fn test_face_name_optional_fields() {
        // TTF with an alternate font.
        let mut payload = vec![0x81];
        payload.extend(utf16("굴림"));
        payload.push(1);
        payload.extend(utf16("Gulim"));
        let record = Record::new(HwpTag::FaceName as u16, 1, payload);
        let model = parse_model(Version::new(5, 0, 0, 6), &record, None).unwrap();

        let content = &model.content;
        assert_eq!(content.str("name"), Some("굴림"));
        let flags = content.flags("flags").unwrap();
        assert!(flags.enum_value("font_file_type").unwrap().is("TTF").unwrap());
        assert_eq!(content.str("alternate_fontname"), Some("Gulim"));
        assert!(!content.contains("panose1"));
        assert!(!content.contains("default_fontname"));
        assert!(model.unparsed.is_empty());
    }

    #[test]
    fn test_style() {
        let mut payload = utf16("바탕글");
        payload.extend(utf16("Normal"));
        payload.extend_from_slice(&[0, 0, 0x12, 0x04, 0, 0, 1, 0, 0, 0]);
        let record = Record::new(HwpTag::Style as u16, 1, payload);
        let model = parse_model(Version::new(5, 0, 0, 6), &record, None).unwrap();
        let content = &model.content;
        assert_eq!(content.str("local_name"), Some("바탕글"));
        assert_eq!(content.str("name"), Some("Normal"));
        assert_eq!(content.int("flags"), Some(0));
        assert_eq!(content.int("lang_id"), Some(1042));
        assert_eq!(content.int("charshape_id"), Some(1));
        assert_eq!(content.int("unknown"), Some(0));
    }

    #[test]
    fn test_border_fill_gradation() {
        let mut payload = vec![0, 0];
        payload.extend(std::iter::repeat_n(0u8, 6 * 5));
        payload.extend_from_slice(&4u32.to_le_bytes());
        // gradation: type, shear, center, blur, colors
        payload.push(1);
        payload.extend_from_slice(&90u32.to_le_bytes());
        payload.extend_from_slice(&[0; 8]);
        payload.extend_from_slice(&40u32.to_le_bytes());
        payload.extend_from_slice(&2u32.to_le_bytes());
        payload.extend_from_slice(&0xff7f3fu32.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.push(0);
        let record = Record::new(HwpTag::BorderFill as u16, 1, payload);
        let model = parse_model(Version::new(5, 0, 1, 7), &record, None).unwrap();

        let content = &model.content;
        assert_eq!(content.int("fillflags"), Some(4));
        assert!(!content.contains("fill_colorpattern"));
        assert!(!content.contains("fill_image"));
        let gradation = content.get_struct("fill_gradation").unwrap();
        assert_eq!(gradation.int("type"), Some(1));
        assert_eq!(gradation.int("shear"), Some(90));
        assert_eq!(gradation.int("blur"), Some(40));
        let colors: Vec<_> = gradation
            .list("colors")
            .unwrap()
            .iter()
            .filter_map(|v| v.as_int())
            .collect();
        assert_eq!(colors, [0xff7f3f, 0]);
        assert_eq!(content.int("fill_blur_center"), Some(0));
        assert!(model.unparsed.is_empty());
    }

    #[test]
    fn test_id_mappings_version_fields() {
        let payload: Vec<u8> = (0..18u32).flat_map(|n| n.to_le_bytes()).collect();
        let record = Record::new(HwpTag::IdMappings as u16, 0, payload.clone());

        let old = parse_model(Version::new(5, 0, 1, 7), &record, None).unwrap();
        assert_eq!(old.content.int("styles"), Some(14));
        assert!(!old.content.contains("memoshapes"));
        assert_eq!(old.unparsed.len(), 3 * 4);

        let new = parse_model(Version::new(5, 0, 3, 2), &record, None).unwrap();
        assert_eq!(new.content.int("trackchange_authors"), Some(17));
        assert!(new.unparsed.is_empty());
    }
}
