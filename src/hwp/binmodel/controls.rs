//! `CTRL_HEADER` content types and the control id registry.
//!
//! A control record starts with its four byte control id; the registry
//! maps the id to the control's content type at compile time.

use once_cell::sync::Lazy;
use phf::phf_map;

use super::ModelType;
use super::bodytext::MARGIN;
use super::docinfo::BORDER;
use super::field::ContentType;
use super::field::dsl::*;
use crate::common::{Error, Result, Version};
use crate::hwp::dataio::{BitField, BitLayout, EnumTable};

static CONTROLS: phf::Map<&'static str, ModelType> = phf_map! {
    "secd" => ModelType::SectionDef,
    "cold" => ModelType::ColumnsDef,
    "tbl " => ModelType::TableControl,
    "gso " => ModelType::GShapeObjectControl,
    "eqed" => ModelType::EqEditControl,
    "head" => ModelType::Header,
    "foot" => ModelType::Footer,
    "fn  " => ModelType::FootNote,
    "en  " => ModelType::EndNote,
    "atno" => ModelType::AutoNumbering,
    "nwno" => ModelType::NewNumbering,
    "pghd" => ModelType::PageHide,
    "pgct" => ModelType::PageOddEven,
    "pgnp" => ModelType::PageNumberPosition,
    "idxm" => ModelType::IndexMarker,
    "bokm" => ModelType::BookmarkControl,
    "tcps" => ModelType::CharOverlap,
    "tdut" => ModelType::Dutmal,
    "tcmt" => ModelType::HiddenComment,
    "%unk" => ModelType::FieldUnknown,
    "%dte" => ModelType::FieldDate,
    "%ddt" => ModelType::FieldDocDate,
    "%pat" => ModelType::FieldPath,
    "%bmk" => ModelType::FieldBookmark,
    "%mmg" => ModelType::FieldMailMerge,
    "%xrf" => ModelType::FieldCrossRef,
    "%fmu" => ModelType::FieldFormula,
    "%clk" => ModelType::FieldClickHere,
    "%smr" => ModelType::FieldSummary,
    "%usr" => ModelType::FieldUserInfo,
    "%hlk" => ModelType::FieldHyperLink,
};

/// Control type registered under `chid`.
pub fn lookup(chid: &str) -> Option<ModelType> {
    CONTROLS.get(chid).copied()
}

/// Disagreement between the control table and the types' own ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryConflict {
    /// Two types claim one id
    Duplicate {
        chid: &'static str,
        first: &'static str,
        second: &'static str,
    },
    /// A control type the table cannot resolve
    Unresolved {
        type_name: &'static str,
        reason: &'static str,
    },
}

impl From<&RegistryConflict> for Error {
    fn from(conflict: &RegistryConflict) -> Self {
        match *conflict {
            RegistryConflict::Duplicate { chid, first, second } => Error::DuplicateControlIdentifier {
                chid: chid.to_string(),
                first,
                second,
            },
            RegistryConflict::Unresolved { type_name, reason } => Error::RegistryInconsistency {
                type_name,
                reason: reason.to_string(),
            },
        }
    }
}

/// First conflict among `(chid, type)` registrations, checked against
/// the id table `lookup`.
fn find_conflict(
    entries: &[(&'static str, ModelType)],
    lookup: impl Fn(&str) -> Option<ModelType>,
) -> Option<RegistryConflict> {
    for (i, &(chid, ty)) in entries.iter().enumerate() {
        if let Some(&(_, first)) = entries[..i].iter().find(|(c, _)| *c == chid) {
            return Some(RegistryConflict::Duplicate {
                chid,
                first: first.name(),
                second: ty.name(),
            });
        }
        match lookup(chid) {
            Some(registered) if registered == ty => {},
            Some(registered) => {
                return Some(RegistryConflict::Duplicate {
                    chid,
                    first: registered.name(),
                    second: ty.name(),
                });
            },
            None => {
                return Some(RegistryConflict::Unresolved {
                    type_name: ty.name(),
                    reason: "control id missing from the id table",
                });
            },
        }
    }
    None
}

static REGISTRY_CONFLICT: Lazy<Option<RegistryConflict>> = Lazy::new(|| {
    let mut entries = Vec::with_capacity(ModelType::CONTROLS.len());
    for &ty in ModelType::CONTROLS {
        match ty.chid() {
            Some(chid) => entries.push((chid, ty)),
            None => {
                return Some(RegistryConflict::Unresolved {
                    type_name: ty.name(),
                    reason: "control type without a control id",
                });
            },
        }
    }
    find_conflict(&entries, lookup)
});

/// Check that every control id names exactly one control type.
pub fn verify_registry() -> Result<()> {
    match &*REGISTRY_CONFLICT {
        None => Ok(()),
        Some(conflict) => Err(conflict.into()),
    }
}

/// Any control; also used for unregistered ids.
pub static CONTROL: ContentType = ContentType::new("Control", &[chid("chid")]);

pub static VRELTO: EnumTable = EnumTable {
    name: "CommonControl.VRelTo",
    items: &[("PAPER", 0), ("PAGE", 1), ("PARAGRAPH", 2)],
};

pub static HRELTO: EnumTable = EnumTable {
    name: "CommonControl.HRelTo",
    items: &[("PAPER", 0), ("PAGE", 1), ("COLUMN", 2), ("PARAGRAPH", 3)],
};

pub static FLOW: EnumTable = EnumTable {
    name: "CommonControl.Flow",
    items: &[("FLOAT", 0), ("BLOCK", 1), ("BACK", 2), ("FRONT", 3)],
};

pub static NUMBER_CATEGORY: EnumTable = EnumTable {
    name: "CommonControl.NumberCategory",
    items: &[("NONE", 0), ("FIGURE", 1), ("TABLE", 2), ("EQUATION", 3)],
};

pub static COMMON_CONTROL_FLAGS: BitLayout = BitLayout {
    name: "CommonControl.Flags",
    fields: &[
        BitField::flag("inline", 0),
        BitField::flag("affect_line_spacing", 2),
        BitField::enumerated("vrelto", 3, 4, &VRELTO),
        BitField::bits("valign", 5, 7),
        BitField::enumerated("hrelto", 8, 9, &HRELTO),
        BitField::bits("halign", 10, 12),
        BitField::flag("restrict_in_page", 13),
        BitField::flag("overlap_others", 14),
        BitField::bits("width_relto", 15, 17),
        BitField::bits("height_relto", 18, 19),
        BitField::flag("protect_size_when_vrelto_paragraph", 20),
        BitField::enumerated("flow", 21, 23, &FLOW),
        BitField::bits("text_side", 24, 25),
        BitField::enumerated("number_category", 26, 27, &NUMBER_CATEGORY),
    ],
};

/// Placement shared by tables, drawing objects and equations
pub static COMMON_CONTROL: ContentType = ContentType::extends(
    "CommonControl",
    &CONTROL,
    &[
        flags("flags", Prim::U32, &COMMON_CONTROL_FLAGS),
        shwpunit("y"),
        shwpunit("x"),
        hwpunit("width"),
        hwpunit("height"),
        i16("z_order"),
        i16("unknown1"),
        structure("margin", MARGIN),
        u32("instance_id"),
        i32("unknown2").since(Version::new(5, 0, 0, 5)),
        bstr("description").since(Version::new(5, 0, 0, 5)),
    ],
);

pub static TABLE_CONTROL: ContentType = ContentType::extends("TableControl", &COMMON_CONTROL, &[]);

pub static GSHAPE_OBJECT_CONTROL: ContentType =
    ContentType::extends("GShapeObjectControl", &COMMON_CONTROL, &[]);

pub static EQ_EDIT_CONTROL: ContentType = ContentType::extends("EqEditControl", &COMMON_CONTROL, &[]);

pub static SECTION_DEF_FLAGS: BitLayout = BitLayout {
    name: "SectionDef.Flags",
    fields: &[
        BitField::flag("hide_header", 0),
        BitField::flag("hide_footer", 1),
        BitField::flag("hide_page", 2),
        BitField::flag("hide_border", 3),
        BitField::flag("hide_background", 4),
        BitField::flag("hide_pagenumber", 5),
        BitField::flag("show_border_on_first_page_only", 8),
        BitField::flag("show_background_on_first_page_only", 9),
        BitField::bits("text_direction", 16, 18),
        BitField::flag("hide_blank_line", 19),
        BitField::bits("pagenum_on_split_section", 20, 21),
        BitField::flag("squared_manuscript_paper", 22),
    ],
};

pub static SECTION_DEF: ContentType = ContentType::extends(
    "SectionDef",
    &CONTROL,
    &[
        flags("flags", Prim::U32, &SECTION_DEF_FLAGS),
        hwpunit16("columnspacing"),
        hwpunit16("grid_vertical"),
        hwpunit16("grid_horizontal"),
        hwpunit("defaultTabStops"),
        u16("numbering_shape_id"),
        u16("starting_pagenum"),
        u16("starting_picturenum"),
        u16("starting_tablenum"),
        u16("starting_equationnum"),
        u32("unknown1").since(Version::new(5, 0, 1, 7)),
        u32("unknown2").since(Version::new(5, 0, 1, 7)),
    ],
);

pub static COLUMN_KIND: EnumTable = EnumTable {
    name: "ColumnsDef.Kind",
    items: &[("NORMAL", 0), ("DISTRIBUTED", 1), ("PARALLEL", 2)],
};

pub static COLUMN_DIRECTION: EnumTable = EnumTable {
    name: "ColumnsDef.Direction",
    items: &[("L2R", 0), ("R2L", 1), ("BOTH", 2)],
};

pub static COLUMNS_DEF_FLAGS: BitLayout = BitLayout {
    name: "ColumnsDef.Flags",
    fields: &[
        BitField::enumerated("kind", 0, 1, &COLUMN_KIND),
        BitField::bits("count", 2, 9),
        BitField::enumerated("direction", 10, 11, &COLUMN_DIRECTION),
        BitField::flag("same_widths", 12),
    ],
};

pub static COLUMNS_DEF: ContentType = ContentType::extends(
    "ColumnsDef",
    &CONTROL,
    &[
        flags("flags", Prim::U16, &COLUMNS_DEF_FLAGS),
        hwpunit16("spacing"),
        array(
            "widths",
            &FieldKind::Prim(Prim::U16),
            Count::FlagBits {
                field: "flags",
                bits: "count",
            },
        )
        .when(flag_clear("flags", "same_widths")),
        u16("attr2"),
        structure("splitter", BORDER),
    ],
);

pub static HEADER_FOOTER_FLAGS: BitLayout = BitLayout {
    name: "HeaderFooter.Flags",
    fields: &[BitField::bits("places", 0, 1)],
};

pub static HEADER: ContentType = ContentType::extends(
    "Header",
    &CONTROL,
    &[flags("flags", Prim::U32, &HEADER_FOOTER_FLAGS)],
);

pub static FOOTER: ContentType = ContentType::extends(
    "Footer",
    &CONTROL,
    &[flags("flags", Prim::U32, &HEADER_FOOTER_FLAGS)],
);

pub static FOOT_NOTE: ContentType = ContentType::extends("FootNote", &CONTROL, &[u32("number")]);

pub static END_NOTE: ContentType = ContentType::extends("EndNote", &CONTROL, &[u32("number")]);

pub static NUMBERING_KIND: EnumTable = EnumTable {
    name: "Numbering.Kind",
    items: &[
        ("PAGE", 0),
        ("FOOTNOTE", 1),
        ("ENDNOTE", 2),
        ("PICTURE", 3),
        ("TABLE", 4),
        ("EQUATION", 5),
    ],
};

pub static AUTO_NUMBERING_FLAGS: BitLayout = BitLayout {
    name: "AutoNumbering.Flags",
    fields: &[
        BitField::enumerated("kind", 0, 3, &NUMBERING_KIND),
        BitField::bits("shape", 4, 11),
        BitField::flag("superscript", 12),
    ],
};

pub static AUTO_NUMBERING: ContentType = ContentType::extends(
    "AutoNumbering",
    &CONTROL,
    &[
        flags("flags", Prim::U32, &AUTO_NUMBERING_FLAGS),
        u16("number"),
        wchar("usersymbol"),
        wchar("prefix"),
        wchar("suffix"),
    ],
);

pub static NEW_NUMBERING_FLAGS: BitLayout = BitLayout {
    name: "NewNumbering.Flags",
    fields: &[BitField::enumerated("kind", 0, 3, &NUMBERING_KIND)],
};

pub static NEW_NUMBERING: ContentType = ContentType::extends(
    "NewNumbering",
    &CONTROL,
    &[flags("flags", Prim::U32, &NEW_NUMBERING_FLAGS), u16("number")],
);

pub static PAGE_HIDE_FLAGS: BitLayout = BitLayout {
    name: "PageHide.Flags",
    fields: &[
        BitField::flag("header", 0),
        BitField::flag("footer", 1),
        BitField::flag("basepage", 2),
        BitField::flag("pageborder", 3),
        BitField::flag("pagefill", 4),
        BitField::flag("pagenumber", 5),
    ],
};

pub static PAGE_HIDE: ContentType = ContentType::extends(
    "PageHide",
    &CONTROL,
    &[flags("flags", Prim::U32, &PAGE_HIDE_FLAGS)],
);

pub static PAGE_ODD_EVEN_FLAGS: BitLayout = BitLayout {
    name: "PageOddEven.Flags",
    fields: &[BitField::bits("pages", 0, 1)],
};

pub static PAGE_ODD_EVEN: ContentType = ContentType::extends(
    "PageOddEven",
    &CONTROL,
    &[flags("flags", Prim::U32, &PAGE_ODD_EVEN_FLAGS)],
);

pub static PAGE_NUMBER_POSITION_FLAGS: BitLayout = BitLayout {
    name: "PageNumberPosition.Flags",
    fields: &[BitField::bits("shape", 0, 7), BitField::bits("position", 8, 11)],
};

pub static PAGE_NUMBER_POSITION: ContentType = ContentType::extends(
    "PageNumberPosition",
    &CONTROL,
    &[
        flags("flags", Prim::U32, &PAGE_NUMBER_POSITION_FLAGS),
        wchar("usersymbol"),
        wchar("prefix"),
        wchar("suffix"),
        wchar("dash"),
    ],
);

pub static INDEX_MARKER: ContentType = ContentType::extends(
    "IndexMarker",
    &CONTROL,
    &[bstr("keyword1"), bstr("keyword2"), u16("dummy")],
);

/// The bookmark name lives in the following `CTRL_DATA`
pub static BOOKMARK_CONTROL: ContentType = ContentType::extends("BookmarkControl", &CONTROL, &[]);

pub static CHAR_OVERLAP: ContentType = ContentType::extends(
    "CharOverlap",
    &CONTROL,
    &[
        array("chars", &FieldKind::Prim(Prim::WChar), Count::Prefixed(Prim::U16)),
        u8("border_type"),
        i8("internal_text_size"),
        u8("internal_text_ratio"),
        array("charshapes", &FieldKind::Prim(Prim::U32), Count::Prefixed(Prim::U8)),
    ],
);

pub static DUTMAL: ContentType = ContentType::extends(
    "Dutmal",
    &CONTROL,
    &[
        bstr("maintext"),
        bstr("subtext"),
        u32("position"),
        u32("fsizeratio"),
        u32("option"),
        u32("stylenumber"),
        u32("align"),
    ],
);

pub static HIDDEN_COMMENT: ContentType = ContentType::extends("HiddenComment", &CONTROL, &[]);

pub static FIELD_FLAGS: BitLayout = BitLayout {
    name: "Field.Flags",
    fields: &[
        BitField::flag("editable_in_form_mode", 0),
        BitField::bits("visited_type", 11, 14),
        BitField::flag("modified", 15),
    ],
};

static FIELD_FIELDS: &[Field] = &[
    flags("flags", Prim::U32, &FIELD_FLAGS),
    u8("extra_attr"),
    bstr("command"),
    u32("id"),
];

macro_rules! field_control {
    ($static:ident, $name:literal) => {
        pub static $static: ContentType = ContentType::extends($name, &CONTROL, FIELD_FIELDS);
    };
}

field_control!(FIELD_UNKNOWN, "FieldUnknown");
field_control!(FIELD_DATE, "FieldDate");
field_control!(FIELD_DOC_DATE, "FieldDocDate");
field_control!(FIELD_PATH, "FieldPath");
field_control!(FIELD_BOOKMARK, "FieldBookmark");
field_control!(FIELD_MAIL_MERGE, "FieldMailMerge");
field_control!(FIELD_CROSS_REF, "FieldCrossRef");
field_control!(FIELD_FORMULA, "FieldFormula");
field_control!(FIELD_CLICK_HERE, "FieldClickHere");
field_control!(FIELD_SUMMARY, "FieldSummary");
field_control!(FIELD_USER_INFO, "FieldUserInfo");
field_control!(FIELD_HYPER_LINK, "FieldHyperLink");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwp::binmodel::parse_model;
    use crate::hwp::consts::HwpTag;
    use crate::hwp::fixtures::{TABLE_CAPTION_CELL, TABLE_CONTROL};
    use crate::hwp::record::{Record, read_records};

    #[test]
    fn test_registry_is_consistent() {
        verify_registry().unwrap();
        assert_eq!(CONTROLS.len(), ModelType::CONTROLS.len());
        for &ty in ModelType::CONTROLS {
            assert_eq!(lookup(ty.chid().unwrap()), Some(ty));
        }
        assert_eq!(lookup("tbl "), Some(ModelType::TableControl));
        assert_eq!(lookup("tbl"), None);
    }

    #[test]
    fn test_duplicate_control_id() {
        let entries = [
            ("tbl ", ModelType::TableControl),
            ("gso ", ModelType::GShapeObjectControl),
            ("tbl ", ModelType::EqEditControl),
        ];
        let conflict = find_conflict(&entries, lookup).unwrap();
        let err = Error::from(&conflict);
        assert!(matches!(
            err,
            Error::DuplicateControlIdentifier { ref chid, first: "TableControl", second: "EqEditControl" }
                if chid == "tbl "
        ));
    }

    #[test]
    fn test_control_id_registered_to_another_type() {
        let entries = [("tbl ", ModelType::TableControl)];
        let conflict = find_conflict(&entries, |_| Some(ModelType::Header)).unwrap();
        assert_eq!(
            conflict,
            RegistryConflict::Duplicate {
                chid: "tbl ",
                first: "Header",
                second: "TableControl",
            }
        );
    }

    #[test]
    fn test_unregistered_control_id() {
        let entries = [("tbl ", ModelType::TableControl), ("xxxx", ModelType::Footer)];
        let conflict = find_conflict(&entries, lookup).unwrap();
        assert!(matches!(
            Error::from(&conflict),
            Error::RegistryInconsistency { type_name: "Footer", .. }
        ));
        assert_eq!(find_conflict(&entries[..1], lookup), None);
    }

    #[test]
    fn test_table_control_5000() {
        let record = read_records(TABLE_CONTROL).unwrap().remove(0);
        assert_eq!(record.level, 1);
        let model = parse_model(Version::new(5, 0, 0, 0), &record, None).unwrap();
        assert_eq!(model.model_type, ModelType::TableControl);

        let content = &model.content;
        assert_eq!(content.str("chid"), Some("tbl "));
        assert_eq!(content.int("flags"), Some(0x082a_2311));
        assert_eq!(content.int("y"), Some(0));
        assert_eq!(content.int("x"), Some(0));
        assert_eq!(content.int("width"), Some(40454));
        assert_eq!(content.int("height"), Some(4164));
        assert_eq!(content.int("z_order"), Some(0));
        assert_eq!(content.int("instance_id"), Some(1453501933));
        assert!(!content.contains("unknown2"));
        assert!(!content.contains("description"));
        let margin = content.get_struct("margin").unwrap();
        assert_eq!(margin.int("left"), Some(283));

        let flags = content.flags("flags").unwrap();
        assert!(flags.is_set("inline").unwrap());
        assert!(flags.enum_value("vrelto").unwrap().is("PARAGRAPH").unwrap());
        assert!(flags.enum_value("hrelto").unwrap().is("PARAGRAPH").unwrap());
        assert!(flags.is_set("restrict_in_page").unwrap());
        assert!(flags.enum_value("number_category").unwrap().is("TABLE").unwrap());

        assert_eq!(model.consumed(), 40);
        assert_eq!(&model.unparsed[..], b"\x00\x00\x00\x00");
    }

    #[test]
    fn test_table_control_without_description() {
        let record = read_records(TABLE_CAPTION_CELL).unwrap().remove(0);
        let model = parse_model(Version::new(5, 0, 1, 7), &record, None).unwrap();
        assert_eq!(model.content.int("unknown2"), Some(0));
        assert!(!model.content.contains("description"));
        assert!(model.unparsed.is_empty());
    }

    #[test]
    fn test_columns_def_widths() {
        let mut payload = b"dloc".to_vec();
        // two columns, widths listed
        payload.extend_from_slice(&(2u16 << 2).to_le_bytes());
        payload.extend_from_slice(&1134u16.to_le_bytes());
        payload.extend_from_slice(&20000u16.to_le_bytes());
        payload.extend_from_slice(&12000u16.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes());
        payload.extend_from_slice(&[1, 0, 0, 0, 0, 0]);
        let record = Record::new(HwpTag::CtrlHeader as u16, 1, payload);
        let model = parse_model(Version::new(5, 0, 1, 7), &record, None).unwrap();
        assert_eq!(model.model_type, ModelType::ColumnsDef);

        let widths: Vec<_> = model
            .content
            .list("widths")
            .unwrap()
            .iter()
            .filter_map(|v| v.as_int())
            .collect();
        assert_eq!(widths, [20000, 12000]);
        let splitter = model.content.get_struct("splitter").unwrap();
        assert!(splitter.get("stroke_flags").unwrap().as_enum().unwrap().is("SOLID").unwrap());
        assert!(model.unparsed.is_empty());
    }

    #[test]
    fn test_columns_def_same_widths() {
        let mut payload = b"dloc".to_vec();
        payload.extend_from_slice(&((1u16 << 12) | (2 << 2)).to_le_bytes());
        payload.extend_from_slice(&1134u16.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes());
        payload.extend_from_slice(&[0; 6]);
        let record = Record::new(HwpTag::CtrlHeader as u16, 1, payload);
        let model = parse_model(Version::new(5, 0, 1, 7), &record, None).unwrap();
        assert!(!model.content.contains("widths"));
        assert!(model.content.contains("splitter"));
        assert!(model.unparsed.is_empty());
    }

    #[test]
    fn test_field_control() {
        let mut payload = b"klh%".to_vec();
        payload.extend_from_slice(&1u32.to_le_bytes());
        payload.push(0);
        payload.extend_from_slice(&2u16.to_le_bytes());
        payload.extend_from_slice(b"a\x00b\x00");
        payload.extend_from_slice(&9u32.to_le_bytes());
        let record = Record::new(HwpTag::CtrlHeader as u16, 1, payload);
        let model = parse_model(Version::new(5, 0, 1, 7), &record, None).unwrap();
        assert_eq!(model.model_type, ModelType::FieldHyperLink);
        assert_eq!(model.content.str("command"), Some("ab"));
        assert_eq!(model.content.int("id"), Some(9));
        assert!(
            model
                .content
                .flags("flags")
                .unwrap()
                .is_set("editable_in_form_mode")
                .unwrap()
        );
    }
}
