/// First tag id used by HWP 5.x records
pub const HWPTAG_BEGIN: u16 = 0x010;

/// Name of the stream holding document-wide definitions
pub const DOCINFO_STREAM: &str = "DocInfo";

/// Name of the stream holding the file signature and version
pub const FILEHEADER_STREAM: &str = "FileHeader";

/// Prefix of body section streams (`BodyText/Section0`, ...)
pub const SECTION_STREAM_PREFIX: &str = "BodyText/Section";

/// Record tag identifiers.
///
/// The numeric value of each variant is the tag id found in the record
/// header. Ids this crate does not know map to [`HwpTag::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum HwpTag {
    // DocInfo
    DocumentProperties = HWPTAG_BEGIN,
    IdMappings = HWPTAG_BEGIN + 1,
    BinData = HWPTAG_BEGIN + 2,
    FaceName = HWPTAG_BEGIN + 3,
    BorderFill = HWPTAG_BEGIN + 4,
    CharShape = HWPTAG_BEGIN + 5,
    TabDef = HWPTAG_BEGIN + 6,
    Numbering = HWPTAG_BEGIN + 7,
    Bullet = HWPTAG_BEGIN + 8,
    ParaShape = HWPTAG_BEGIN + 9,
    Style = HWPTAG_BEGIN + 10,
    DocData = HWPTAG_BEGIN + 11,
    DistributeDocData = HWPTAG_BEGIN + 12,
    CompatibleDocument = HWPTAG_BEGIN + 14,
    LayoutCompatibility = HWPTAG_BEGIN + 15,

    // BodyText
    ParaHeader = HWPTAG_BEGIN + 50,
    ParaText = HWPTAG_BEGIN + 51,
    ParaCharShape = HWPTAG_BEGIN + 52,
    ParaLineSeg = HWPTAG_BEGIN + 53,
    ParaRangeTag = HWPTAG_BEGIN + 54,
    CtrlHeader = HWPTAG_BEGIN + 55,
    ListHeader = HWPTAG_BEGIN + 56,
    PageDef = HWPTAG_BEGIN + 57,
    FootnoteShape = HWPTAG_BEGIN + 58,
    PageBorderFill = HWPTAG_BEGIN + 59,
    ShapeComponent = HWPTAG_BEGIN + 60,
    Table = HWPTAG_BEGIN + 61,
    ShapeComponentLine = HWPTAG_BEGIN + 62,
    ShapeComponentRectangle = HWPTAG_BEGIN + 63,
    ShapeComponentEllipse = HWPTAG_BEGIN + 64,
    ShapeComponentArc = HWPTAG_BEGIN + 65,
    ShapeComponentPolygon = HWPTAG_BEGIN + 66,
    ShapeComponentCurve = HWPTAG_BEGIN + 67,
    ShapeComponentOle = HWPTAG_BEGIN + 68,
    ShapeComponentPicture = HWPTAG_BEGIN + 69,
    ShapeComponentContainer = HWPTAG_BEGIN + 70,
    CtrlData = HWPTAG_BEGIN + 71,
    EqEdit = HWPTAG_BEGIN + 72,
    ShapeComponentTextArt = HWPTAG_BEGIN + 74,
    FormObject = HWPTAG_BEGIN + 75,
    MemoShape = HWPTAG_BEGIN + 76,
    MemoList = HWPTAG_BEGIN + 77,
    ForbiddenChar = HWPTAG_BEGIN + 78,
    ChartData = HWPTAG_BEGIN + 79,

    Unknown = 0xFFFF,
}

impl From<u16> for HwpTag {
    fn from(value: u16) -> Self {
        match value {
            16 => HwpTag::DocumentProperties,
            17 => HwpTag::IdMappings,
            18 => HwpTag::BinData,
            19 => HwpTag::FaceName,
            20 => HwpTag::BorderFill,
            21 => HwpTag::CharShape,
            22 => HwpTag::TabDef,
            23 => HwpTag::Numbering,
            24 => HwpTag::Bullet,
            25 => HwpTag::ParaShape,
            26 => HwpTag::Style,
            27 => HwpTag::DocData,
            28 => HwpTag::DistributeDocData,
            30 => HwpTag::CompatibleDocument,
            31 => HwpTag::LayoutCompatibility,
            66 => HwpTag::ParaHeader,
            67 => HwpTag::ParaText,
            68 => HwpTag::ParaCharShape,
            69 => HwpTag::ParaLineSeg,
            70 => HwpTag::ParaRangeTag,
            71 => HwpTag::CtrlHeader,
            72 => HwpTag::ListHeader,
            73 => HwpTag::PageDef,
            74 => HwpTag::FootnoteShape,
            75 => HwpTag::PageBorderFill,
            76 => HwpTag::ShapeComponent,
            77 => HwpTag::Table,
            78 => HwpTag::ShapeComponentLine,
            79 => HwpTag::ShapeComponentRectangle,
            80 => HwpTag::ShapeComponentEllipse,
            81 => HwpTag::ShapeComponentArc,
            82 => HwpTag::ShapeComponentPolygon,
            83 => HwpTag::ShapeComponentCurve,
            84 => HwpTag::ShapeComponentOle,
            85 => HwpTag::ShapeComponentPicture,
            86 => HwpTag::ShapeComponentContainer,
            87 => HwpTag::CtrlData,
            88 => HwpTag::EqEdit,
            90 => HwpTag::ShapeComponentTextArt,
            91 => HwpTag::FormObject,
            92 => HwpTag::MemoShape,
            93 => HwpTag::MemoList,
            94 => HwpTag::ForbiddenChar,
            95 => HwpTag::ChartData,
            _ => HwpTag::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_conversion() {
        assert_eq!(HwpTag::from(18), HwpTag::BinData);
        assert_eq!(HwpTag::from(71), HwpTag::CtrlHeader);
        assert_eq!(HwpTag::from(77), HwpTag::Table);
        assert_eq!(HwpTag::from(29), HwpTag::Unknown);
        assert_eq!(HwpTag::Table as u16, 77);
        assert_eq!(HwpTag::ChartData as u16, 95);
    }
}
