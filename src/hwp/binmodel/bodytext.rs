//! Content types of `BodyText` sections: paragraphs and list headers.

use super::field::ContentType;
use super::field::dsl::*;
use crate::common::{Version, VersionRange};
use crate::hwp::controlchar;
use crate::hwp::dataio::{BitField, BitLayout, EnumTable};

/// Fallback for unknown tags; any version, no fields.
pub static RECORD_MODEL: ContentType = ContentType {
    name: "RecordModel",
    base: None,
    fields: &[],
    supported: VersionRange::ALL,
};

pub static MARGIN: &[Field] = &[
    hwpunit16("left"),
    hwpunit16("right"),
    hwpunit16("top"),
    hwpunit16("bottom"),
];

pub static PARA_TEXT_FLAGS: BitLayout = BitLayout {
    name: "Paragraph.Text",
    fields: &[BitField::bits("chars", 0, 30), BitField::flag("unknown", 31)],
};

pub static PARA_SPLIT: BitLayout = BitLayout {
    name: "Paragraph.Split",
    fields: &[
        BitField::flag("new_section", 0),
        BitField::flag("new_columnsdef", 1),
        BitField::flag("new_page", 2),
        BitField::flag("new_column", 3),
    ],
};

pub static PARAGRAPH: ContentType = ContentType::new(
    "Paragraph",
    &[
        flags("text", Prim::U32, &PARA_TEXT_FLAGS),
        u32("controlmask"),
        u16("parashape_id"),
        u8("style_id"),
        flags("split", Prim::U8, &PARA_SPLIT),
        u16("charshapes"),
        u16("rangetags"),
        u16("linesegs"),
        u32("instance_id"),
        u16("changetrackingmerge").since(Version::new(5, 0, 3, 2)),
    ],
);

pub static PARA_TEXT: ContentType = ContentType::new(
    "ParaText",
    &[Field::new("chunks", FieldKind::Custom(controlchar::decode_chunks))],
);

/// `(position, charshape_id)`
const CHARSHAPE_RUN: FieldKind = FieldKind::Tuple(&[Prim::U32, Prim::U32]);

pub static PARA_CHAR_SHAPE: ContentType = ContentType::new(
    "ParaCharShape",
    &[array("charshapes", &CHARSHAPE_RUN, Count::Parent("charshapes"))],
);

pub static LINE_SEG_FLAGS: BitLayout = BitLayout {
    name: "LineSeg.Flags",
    fields: &[
        BitField::flag("indented", 20),
        BitField::flag("heading_applied", 21),
    ],
};

pub static LINE_SEG: &[Field] = &[
    u32("chpos"),
    shwpunit("y"),
    shwpunit("height"),
    shwpunit("height_text"),
    shwpunit("height_baseline"),
    shwpunit("space_below"),
    shwpunit("x"),
    shwpunit("width"),
    flags("lineseg_flags", Prim::U32, &LINE_SEG_FLAGS),
];

pub static PARA_LINE_SEG: ContentType = ContentType::new(
    "ParaLineSeg",
    &[array("linesegs", &FieldKind::Struct(LINE_SEG), Count::Parent("linesegs"))],
);

static RANGE_TAG: &[Field] = &[u32("start"), u32("end"), u32("tag")];

pub static PARA_RANGE_TAG: ContentType = ContentType::new(
    "ParaRangeTag",
    &[array("range_tags", &FieldKind::Struct(RANGE_TAG), Count::Parent("rangetags"))],
);

pub static LIST_FLAGS: BitLayout = BitLayout {
    name: "ListHeader.Flags",
    fields: &[
        BitField::bits("textdirection", 0, 2),
        BitField::bits("linebreak", 3, 4),
        BitField::bits("valign", 5, 6),
    ],
};

pub static LIST_HEADER: ContentType = ContentType::new(
    "ListHeader",
    &[
        u16("paragraphs"),
        u16("unknown1"),
        flags("listflags", Prim::U32, &LIST_FLAGS),
    ],
);

pub static TABLE_CELL: ContentType = ContentType::extends(
    "TableCell",
    &LIST_HEADER,
    &[
        u16("col"),
        u16("row"),
        u16("colspan"),
        u16("rowspan"),
        shwpunit("width"),
        shwpunit("height"),
        structure("padding", MARGIN),
        u16("borderfill_id"),
        shwpunit("unknown_width"),
    ],
);

pub static CAPTION_POSITION: EnumTable = EnumTable {
    name: "Caption.Position",
    items: &[("LEFT", 0), ("RIGHT", 1), ("TOP", 2), ("BOTTOM", 3)],
};

pub static CAPTION_FLAGS: BitLayout = BitLayout {
    name: "Caption.Flags",
    fields: &[
        BitField::enumerated("position", 0, 1, &CAPTION_POSITION),
        BitField::flag("include_margin", 2),
    ],
};

/// Shared by table and drawing object captions
pub static CAPTION_PARAGRAPH_LIST: ContentType = ContentType::extends(
    "CaptionParagraphList",
    &LIST_HEADER,
    &[
        flags("flags", Prim::U32, &CAPTION_FLAGS),
        hwpunit("width"),
        hwpunit16("separation"),
        hwpunit("max_width"),
    ],
);

pub static TABLE_CAPTION: ContentType = ContentType::extends("TableCaption", &CAPTION_PARAGRAPH_LIST, &[]);

pub static GSHAPE_OBJECT_CAPTION: ContentType =
    ContentType::extends("GShapeObjectCaption", &CAPTION_PARAGRAPH_LIST, &[]);

pub static TEXTBOX_PARAGRAPH_LIST: ContentType = ContentType::extends(
    "TextboxParagraphList",
    &LIST_HEADER,
    &[structure("padding", MARGIN), hwpunit("maxwidth")],
);

static HEADER_FOOTER_FIELDS: &[Field] = &[
    hwpunit("width"),
    hwpunit("height"),
    u8("textrefsbitmap"),
    u8("numberrefsbitmap"),
];

pub static HEADER_PARAGRAPH_LIST: ContentType =
    ContentType::extends("HeaderParagraphList", &LIST_HEADER, HEADER_FOOTER_FIELDS);

pub static FOOTER_PARAGRAPH_LIST: ContentType =
    ContentType::extends("FooterParagraphList", &LIST_HEADER, HEADER_FOOTER_FIELDS);

pub static BOOKBINDING: EnumTable = EnumTable {
    name: "PageDef.Bookbinding",
    items: &[("LEFT", 0), ("RIGHT", 1), ("TOP", 2), ("BOTTOM", 3)],
};

pub static PAGE_DEF_FLAGS: BitLayout = BitLayout {
    name: "PageDef.Flags",
    fields: &[
        BitField::flag("landscape", 0),
        BitField::enumerated("bookbinding", 1, 2, &BOOKBINDING),
    ],
};

pub static PAGE_DEF: ContentType = ContentType::new(
    "PageDef",
    &[
        hwpunit("width"),
        hwpunit("height"),
        hwpunit("left_offset"),
        hwpunit("right_offset"),
        hwpunit("top_offset"),
        hwpunit("bottom_offset"),
        hwpunit("header_offset"),
        hwpunit("footer_offset"),
        hwpunit("bookbinding_offset"),
        flags("attr", Prim::U32, &PAGE_DEF_FLAGS),
    ],
);

pub static FOOTNOTE_SHAPE: ContentType = ContentType::new(
    "FootnoteShape",
    &[
        u32("flags"),
        wchar("usersymbol"),
        wchar("prefix"),
        wchar("suffix"),
        u16("starting_number"),
        hwpunit16("splitter_length"),
        hwpunit16("splitter_unknown"),
        hwpunit16("splitter_margin_top"),
        hwpunit16("splitter_margin_bottom"),
        hwpunit16("notes_spacing"),
        enumerated("splitter_stroke_type", Prim::U8, &super::docinfo::STROKE_TYPE),
        u8("splitter_width"),
        color("splitter_color").since(Version::new(5, 0, 0, 6)),
    ],
);

pub static PAGE_BORDER_FILL_FLAGS: BitLayout = BitLayout {
    name: "PageBorderFill.Flags",
    fields: &[
        BitField::flag("relative_to_paper", 0),
        BitField::flag("include_header", 1),
        BitField::flag("include_footer", 2),
        BitField::bits("fill", 3, 4),
    ],
};

pub static PAGE_BORDER_FILL: ContentType = ContentType::new(
    "PageBorderFill",
    &[
        flags("flags", Prim::U32, &PAGE_BORDER_FILL_FLAGS),
        structure("margin", MARGIN),
        u16("borderfill_id"),
    ],
);

static ZONE: &[Field] = &[
    u16("starting_column"),
    u16("starting_row"),
    u16("end_column"),
    u16("end_row"),
    u16("borderfill_id"),
];

pub static TABLE_FLAGS: BitLayout = BitLayout {
    name: "TableBody.Flags",
    fields: &[
        BitField::bits("split_page", 0, 1),
        BitField::flag("repeat_header", 2),
    ],
};

pub static TABLE_BODY: ContentType = ContentType::new(
    "TableBody",
    &[
        flags("flags", Prim::U32, &TABLE_FLAGS),
        u16("rows"),
        u16("cols"),
        hwpunit16("cellspacing"),
        structure("padding", MARGIN),
        array("rowcols", &FieldKind::Prim(Prim::U16), Count::Field("rows")),
        u16("borderfill_id"),
        array("validZones", &FieldKind::Struct(ZONE), Count::Prefixed(Prim::U16))
            .since(Version::new(5, 0, 0, 7)),
    ],
);

/// Parameter sets; kept unparsed
pub static CONTROL_DATA: ContentType = ContentType::new("ControlData", &[]);

pub static EQ_EDIT: ContentType = ContentType::new(
    "EqEdit",
    &[
        u32("flags"),
        bstr("script"),
        hwpunit("font_size"),
        color("color"),
        i16("baseline"),
        u16("unknown1"),
        bstr("version_info"),
        bstr("font_name").since(Version::new(5, 0, 3, 0)),
    ],
);

pub static FORM_OBJECT: ContentType = ContentType::new("FormObject", &[]);

pub static MEMO_SHAPE: ContentType = ContentType::new("MemoShape", &[]);

pub static MEMO_LIST: ContentType = ContentType::new("MemoList", &[]);

pub static CHART_DATA: ContentType = ContentType::new("ChartData", &[]);
