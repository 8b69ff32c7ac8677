//! Record models: records decoded into typed content.
//!
//! A record's [`ModelType`] is resolved from its tag, from the control id
//! at the start of `CTRL_HEADER` payloads, and finally by its parent
//! container. The type's field table then decodes the payload into
//! [`Content`].
//!
//! # Example
//!
//! ```
//! use hwpmodel::hwp::binmodel::{parse_models, ModelType};
//! use hwpmodel::hwp::record::read_records;
//! use hwpmodel::Version;
//!
//! // A BinData record of an embedded `jpg`
//! let data = b"\x12\x04\xc0\x00\x01\x00\x02\x00\x03\x00j\x00p\x00g\x00";
//! let records = read_records(data)?;
//! let models: Vec<_> = parse_models(Version::new(5, 0, 1, 7), records.into_iter().map(Ok))
//!     .collect::<Result<_, _>>()?;
//!
//! assert_eq!(models[0].model_type, ModelType::BinData);
//! let bindata = models[0].content.get_struct("bindata").unwrap();
//! assert_eq!(bindata.str("ext"), Some("jpg"));
//! # Ok::<(), hwpmodel::Error>(())
//! ```

pub mod bodytext;
pub mod context;
pub mod controls;
pub mod decode;
pub mod docinfo;
pub mod field;
pub mod shapes;

use std::sync::Arc;

use bytes::Bytes;

pub use context::{ContainerState, Parent, ParseContext, TableParseState};
pub use field::{ContentType, Field, FieldKind};

use crate::common::binary::decode_chid;
use crate::common::{Result, Version};
use crate::hwp::consts::HwpTag;
use crate::hwp::dataio::Content;
use crate::hwp::record::Record;
use crate::hwp::treeop::{PrefixEvents, TreeEvent};

/// Closed set of content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// Record of an unknown tag; the payload is kept unparsed
    RecordModel,

    // DocInfo
    DocumentProperties,
    IdMappings,
    BinData,
    FaceName,
    BorderFill,
    CharShape,
    TabDef,
    Numbering,
    Bullet,
    ParaShape,
    Style,
    DocData,
    DistributeDocData,
    CompatibleDocument,
    LayoutCompatibility,
    ForbiddenChar,

    // BodyText
    Paragraph,
    ParaText,
    ParaCharShape,
    ParaLineSeg,
    ParaRangeTag,
    ListHeader,
    PageDef,
    FootnoteShape,
    PageBorderFill,
    ShapeComponent,
    TableBody,
    ShapeLine,
    ShapeRectangle,
    ShapeEllipse,
    ShapeArc,
    ShapePolygon,
    ShapeCurve,
    ShapeOLE,
    ShapePicture,
    ShapeContainer,
    ControlData,
    EqEdit,
    ShapeTextArt,
    FormObject,
    MemoShape,
    MemoList,
    ChartData,

    // LIST_HEADER resolved by the parent
    TableCaption,
    TableCell,
    TextboxParagraphList,
    HeaderParagraphList,
    FooterParagraphList,
    GShapeObjectCaption,

    // CTRL_HEADER resolved by control id
    Control,
    SectionDef,
    ColumnsDef,
    TableControl,
    GShapeObjectControl,
    EqEditControl,
    Header,
    Footer,
    FootNote,
    EndNote,
    AutoNumbering,
    NewNumbering,
    PageHide,
    PageOddEven,
    PageNumberPosition,
    IndexMarker,
    BookmarkControl,
    CharOverlap,
    Dutmal,
    HiddenComment,
    FieldUnknown,
    FieldDate,
    FieldDocDate,
    FieldPath,
    FieldBookmark,
    FieldMailMerge,
    FieldCrossRef,
    FieldFormula,
    FieldClickHere,
    FieldSummary,
    FieldUserInfo,
    FieldHyperLink,
}

impl ModelType {
    /// Types resolved from a control id.
    pub const CONTROLS: &'static [ModelType] = &[
        ModelType::SectionDef,
        ModelType::ColumnsDef,
        ModelType::TableControl,
        ModelType::GShapeObjectControl,
        ModelType::EqEditControl,
        ModelType::Header,
        ModelType::Footer,
        ModelType::FootNote,
        ModelType::EndNote,
        ModelType::AutoNumbering,
        ModelType::NewNumbering,
        ModelType::PageHide,
        ModelType::PageOddEven,
        ModelType::PageNumberPosition,
        ModelType::IndexMarker,
        ModelType::BookmarkControl,
        ModelType::CharOverlap,
        ModelType::Dutmal,
        ModelType::HiddenComment,
        ModelType::FieldUnknown,
        ModelType::FieldDate,
        ModelType::FieldDocDate,
        ModelType::FieldPath,
        ModelType::FieldBookmark,
        ModelType::FieldMailMerge,
        ModelType::FieldCrossRef,
        ModelType::FieldFormula,
        ModelType::FieldClickHere,
        ModelType::FieldSummary,
        ModelType::FieldUserInfo,
        ModelType::FieldHyperLink,
    ];

    /// Type of a record judged by its tag alone.
    ///
    /// `CTRL_HEADER` gives the generic [`ModelType::Control`]; see
    /// [`ModelType::resolve`] for the control id lookup.
    pub fn from_tag(tag: HwpTag) -> Self {
        match tag {
            HwpTag::DocumentProperties => ModelType::DocumentProperties,
            HwpTag::IdMappings => ModelType::IdMappings,
            HwpTag::BinData => ModelType::BinData,
            HwpTag::FaceName => ModelType::FaceName,
            HwpTag::BorderFill => ModelType::BorderFill,
            HwpTag::CharShape => ModelType::CharShape,
            HwpTag::TabDef => ModelType::TabDef,
            HwpTag::Numbering => ModelType::Numbering,
            HwpTag::Bullet => ModelType::Bullet,
            HwpTag::ParaShape => ModelType::ParaShape,
            HwpTag::Style => ModelType::Style,
            HwpTag::DocData => ModelType::DocData,
            HwpTag::DistributeDocData => ModelType::DistributeDocData,
            HwpTag::CompatibleDocument => ModelType::CompatibleDocument,
            HwpTag::LayoutCompatibility => ModelType::LayoutCompatibility,
            HwpTag::ForbiddenChar => ModelType::ForbiddenChar,
            HwpTag::ParaHeader => ModelType::Paragraph,
            HwpTag::ParaText => ModelType::ParaText,
            HwpTag::ParaCharShape => ModelType::ParaCharShape,
            HwpTag::ParaLineSeg => ModelType::ParaLineSeg,
            HwpTag::ParaRangeTag => ModelType::ParaRangeTag,
            HwpTag::CtrlHeader => ModelType::Control,
            HwpTag::ListHeader => ModelType::ListHeader,
            HwpTag::PageDef => ModelType::PageDef,
            HwpTag::FootnoteShape => ModelType::FootnoteShape,
            HwpTag::PageBorderFill => ModelType::PageBorderFill,
            HwpTag::ShapeComponent => ModelType::ShapeComponent,
            HwpTag::Table => ModelType::TableBody,
            HwpTag::ShapeComponentLine => ModelType::ShapeLine,
            HwpTag::ShapeComponentRectangle => ModelType::ShapeRectangle,
            HwpTag::ShapeComponentEllipse => ModelType::ShapeEllipse,
            HwpTag::ShapeComponentArc => ModelType::ShapeArc,
            HwpTag::ShapeComponentPolygon => ModelType::ShapePolygon,
            HwpTag::ShapeComponentCurve => ModelType::ShapeCurve,
            HwpTag::ShapeComponentOle => ModelType::ShapeOLE,
            HwpTag::ShapeComponentPicture => ModelType::ShapePicture,
            HwpTag::ShapeComponentContainer => ModelType::ShapeContainer,
            HwpTag::CtrlData => ModelType::ControlData,
            HwpTag::EqEdit => ModelType::EqEdit,
            HwpTag::ShapeComponentTextArt => ModelType::ShapeTextArt,
            HwpTag::FormObject => ModelType::FormObject,
            HwpTag::MemoShape => ModelType::MemoShape,
            HwpTag::MemoList => ModelType::MemoList,
            HwpTag::ChartData => ModelType::ChartData,
            HwpTag::Unknown => ModelType::RecordModel,
        }
    }

    /// Type of a record before its parent is consulted.
    pub fn resolve(record: &Record) -> Self {
        match Self::from_tag(record.tag()) {
            ModelType::Control => match record.payload.get(..4) {
                Some(raw) => {
                    let chid = decode_chid(raw);
                    controls::lookup(&chid).unwrap_or_else(|| {
                        tracing::debug!(seqno = record.seqno, chid = %chid, "unknown control id");
                        ModelType::Control
                    })
                },
                None => ModelType::Control,
            },
            ModelType::RecordModel => {
                tracing::debug!(seqno = record.seqno, tag_id = record.tag_id, "unknown tag");
                ModelType::RecordModel
            },
            other => other,
        }
    }

    /// Type of a child record as arbitrated by this container.
    pub fn resolve_child(self, child: ModelType, state: &ContainerState) -> ModelType {
        if child != ModelType::ListHeader {
            return child;
        }
        match self {
            ModelType::TableControl => {
                if state.table().is_some_and(|t| t.body_seen) {
                    ModelType::TableCell
                } else {
                    ModelType::TableCaption
                }
            },
            ModelType::ShapeComponent => ModelType::TextboxParagraphList,
            ModelType::Header => ModelType::HeaderParagraphList,
            ModelType::Footer => ModelType::FooterParagraphList,
            ModelType::GShapeObjectControl => ModelType::GShapeObjectCaption,
            _ => child,
        }
    }

    /// Observe a resolved child before its fields are decoded.
    pub fn on_child(self, state: &mut ContainerState, child: ModelType) {
        if self == ModelType::TableControl
            && child == ModelType::TableBody
            && let Some(table) = state.table_mut()
        {
            table.body_seen = true;
        }
    }

    /// Fresh container state for a model of this type.
    pub fn initial_state(self) -> ContainerState {
        match self {
            ModelType::TableControl => ContainerState::Table(TableParseState::default()),
            _ => ContainerState::Leaf,
        }
    }

    /// Display name used in serialized output.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Control id a control type is registered under.
    pub fn chid(self) -> Option<&'static str> {
        Some(match self {
            ModelType::SectionDef => "secd",
            ModelType::ColumnsDef => "cold",
            ModelType::TableControl => "tbl ",
            ModelType::GShapeObjectControl => "gso ",
            ModelType::EqEditControl => "eqed",
            ModelType::Header => "head",
            ModelType::Footer => "foot",
            ModelType::FootNote => "fn  ",
            ModelType::EndNote => "en  ",
            ModelType::AutoNumbering => "atno",
            ModelType::NewNumbering => "nwno",
            ModelType::PageHide => "pghd",
            ModelType::PageOddEven => "pgct",
            ModelType::PageNumberPosition => "pgnp",
            ModelType::IndexMarker => "idxm",
            ModelType::BookmarkControl => "bokm",
            ModelType::CharOverlap => "tcps",
            ModelType::Dutmal => "tdut",
            ModelType::HiddenComment => "tcmt",
            ModelType::FieldUnknown => "%unk",
            ModelType::FieldDate => "%dte",
            ModelType::FieldDocDate => "%ddt",
            ModelType::FieldPath => "%pat",
            ModelType::FieldBookmark => "%bmk",
            ModelType::FieldMailMerge => "%mmg",
            ModelType::FieldCrossRef => "%xrf",
            ModelType::FieldFormula => "%fmu",
            ModelType::FieldClickHere => "%clk",
            ModelType::FieldSummary => "%smr",
            ModelType::FieldUserInfo => "%usr",
            ModelType::FieldHyperLink => "%hlk",
            _ => return None,
        })
    }

    /// Field table of this type.
    pub fn descriptor(self) -> &'static ContentType {
        use bodytext as b;
        use controls as c;
        use docinfo as d;
        use shapes as s;

        match self {
            ModelType::RecordModel => &b::RECORD_MODEL,
            ModelType::DocumentProperties => &d::DOCUMENT_PROPERTIES,
            ModelType::IdMappings => &d::ID_MAPPINGS,
            ModelType::BinData => &d::BIN_DATA,
            ModelType::FaceName => &d::FACE_NAME,
            ModelType::BorderFill => &d::BORDER_FILL,
            ModelType::CharShape => &d::CHAR_SHAPE,
            ModelType::TabDef => &d::TAB_DEF,
            ModelType::Numbering => &d::NUMBERING,
            ModelType::Bullet => &d::BULLET,
            ModelType::ParaShape => &d::PARA_SHAPE,
            ModelType::Style => &d::STYLE,
            ModelType::DocData => &d::DOC_DATA,
            ModelType::DistributeDocData => &d::DISTRIBUTE_DOC_DATA,
            ModelType::CompatibleDocument => &d::COMPATIBLE_DOCUMENT,
            ModelType::LayoutCompatibility => &d::LAYOUT_COMPATIBILITY,
            ModelType::ForbiddenChar => &d::FORBIDDEN_CHAR,
            ModelType::Paragraph => &b::PARAGRAPH,
            ModelType::ParaText => &b::PARA_TEXT,
            ModelType::ParaCharShape => &b::PARA_CHAR_SHAPE,
            ModelType::ParaLineSeg => &b::PARA_LINE_SEG,
            ModelType::ParaRangeTag => &b::PARA_RANGE_TAG,
            ModelType::ListHeader => &b::LIST_HEADER,
            ModelType::PageDef => &b::PAGE_DEF,
            ModelType::FootnoteShape => &b::FOOTNOTE_SHAPE,
            ModelType::PageBorderFill => &b::PAGE_BORDER_FILL,
            ModelType::TableBody => &b::TABLE_BODY,
            ModelType::ControlData => &b::CONTROL_DATA,
            ModelType::EqEdit => &b::EQ_EDIT,
            ModelType::FormObject => &b::FORM_OBJECT,
            ModelType::MemoShape => &b::MEMO_SHAPE,
            ModelType::MemoList => &b::MEMO_LIST,
            ModelType::ChartData => &b::CHART_DATA,
            ModelType::TableCaption => &b::TABLE_CAPTION,
            ModelType::TableCell => &b::TABLE_CELL,
            ModelType::TextboxParagraphList => &b::TEXTBOX_PARAGRAPH_LIST,
            ModelType::HeaderParagraphList => &b::HEADER_PARAGRAPH_LIST,
            ModelType::FooterParagraphList => &b::FOOTER_PARAGRAPH_LIST,
            ModelType::GShapeObjectCaption => &b::GSHAPE_OBJECT_CAPTION,
            ModelType::ShapeComponent => &s::SHAPE_COMPONENT,
            ModelType::ShapeLine => &s::SHAPE_LINE,
            ModelType::ShapeRectangle => &s::SHAPE_RECTANGLE,
            ModelType::ShapeEllipse => &s::SHAPE_ELLIPSE,
            ModelType::ShapeArc => &s::SHAPE_ARC,
            ModelType::ShapePolygon => &s::SHAPE_POLYGON,
            ModelType::ShapeCurve => &s::SHAPE_CURVE,
            ModelType::ShapeOLE => &s::SHAPE_OLE,
            ModelType::ShapePicture => &s::SHAPE_PICTURE,
            ModelType::ShapeContainer => &s::SHAPE_CONTAINER,
            ModelType::ShapeTextArt => &s::SHAPE_TEXT_ART,
            ModelType::Control => &c::CONTROL,
            ModelType::SectionDef => &c::SECTION_DEF,
            ModelType::ColumnsDef => &c::COLUMNS_DEF,
            ModelType::TableControl => &c::TABLE_CONTROL,
            ModelType::GShapeObjectControl => &c::GSHAPE_OBJECT_CONTROL,
            ModelType::EqEditControl => &c::EQ_EDIT_CONTROL,
            ModelType::Header => &c::HEADER,
            ModelType::Footer => &c::FOOTER,
            ModelType::FootNote => &c::FOOT_NOTE,
            ModelType::EndNote => &c::END_NOTE,
            ModelType::AutoNumbering => &c::AUTO_NUMBERING,
            ModelType::NewNumbering => &c::NEW_NUMBERING,
            ModelType::PageHide => &c::PAGE_HIDE,
            ModelType::PageOddEven => &c::PAGE_ODD_EVEN,
            ModelType::PageNumberPosition => &c::PAGE_NUMBER_POSITION,
            ModelType::IndexMarker => &c::INDEX_MARKER,
            ModelType::BookmarkControl => &c::BOOKMARK_CONTROL,
            ModelType::CharOverlap => &c::CHAR_OVERLAP,
            ModelType::Dutmal => &c::DUTMAL,
            ModelType::HiddenComment => &c::HIDDEN_COMMENT,
            ModelType::FieldUnknown => &c::FIELD_UNKNOWN,
            ModelType::FieldDate => &c::FIELD_DATE,
            ModelType::FieldDocDate => &c::FIELD_DOC_DATE,
            ModelType::FieldPath => &c::FIELD_PATH,
            ModelType::FieldBookmark => &c::FIELD_BOOKMARK,
            ModelType::FieldMailMerge => &c::FIELD_MAIL_MERGE,
            ModelType::FieldCrossRef => &c::FIELD_CROSS_REF,
            ModelType::FieldFormula => &c::FIELD_FORMULA,
            ModelType::FieldClickHere => &c::FIELD_CLICK_HERE,
            ModelType::FieldSummary => &c::FIELD_SUMMARY,
            ModelType::FieldUserInfo => &c::FIELD_USER_INFO,
            ModelType::FieldHyperLink => &c::FIELD_HYPER_LINK,
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A record decoded into typed content.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub model_type: ModelType,
    pub content: Content,
    pub level: u16,
    pub seqno: usize,
    pub record: Record,
    /// Payload bytes no field consumed
    pub unparsed: Bytes,
}

impl Model {
    /// Payload bytes the fields consumed.
    pub fn consumed(&self) -> usize {
        self.record.payload.len() - self.unparsed.len()
    }
}

/// Decode one record.
///
/// `parent` is the enclosing model with its container state; the parent
/// arbitrates the child's type and observes it before any field is read.
pub fn parse_model(version: Version, record: &Record, mut parent: Option<Parent<'_>>) -> Result<Model> {
    let mut model_type = ModelType::resolve(record);
    if let Some(parent) = parent.as_mut() {
        let container = parent.model_type();
        model_type = container.resolve_child(model_type, parent.state);
        container.on_child(parent.state, model_type);
    }

    let mut ctx = ParseContext::new(version, record, parent);
    let (content, stop) = decode::decode_content(&mut ctx, model_type.descriptor())?;
    let consumed = ctx.cursor.position();
    let unparsed = record.payload.slice(consumed..);

    match stop {
        Some(stop) if !unparsed.is_empty() => tracing::warn!(
            seqno = record.seqno,
            model = model_type.name(),
            field = stop.field,
            error = %stop.error,
            unparsed = unparsed.len(),
            "record decoded partially"
        ),
        Some(stop) => tracing::debug!(
            seqno = record.seqno,
            model = model_type.name(),
            field = stop.field,
            "payload ends before optional field"
        ),
        None if !unparsed.is_empty() => tracing::debug!(
            seqno = record.seqno,
            model = model_type.name(),
            unparsed = unparsed.len(),
            "trailing bytes left unparsed"
        ),
        None => {},
    }

    Ok(Model {
        model_type,
        content,
        level: record.level,
        seqno: record.seqno,
        record: record.clone(),
        unparsed,
    })
}

struct Frame {
    model: Arc<Model>,
    state: ContainerState,
}

type Leveled = fn(Result<Record>) -> Result<(u32, Record)>;

fn leveled(record: Result<Record>) -> Result<(u32, Record)> {
    record.map(|r| (r.level as u32, r))
}

/// Lazy model iterator over a record source.
///
/// Each record is parsed on ENTER with the innermost open model as its
/// parent; the parent's container state lives until its EXIT.
pub struct ModelParser<I>
where
    I: Iterator<Item = Result<Record>>,
{
    version: Version,
    events: PrefixEvents<std::iter::Map<I, Leveled>, Record>,
    stack: Vec<Frame>,
    failed: bool,
}

impl<I> ModelParser<I>
where
    I: Iterator<Item = Result<Record>>,
{
    pub fn new(version: Version, records: I) -> Self {
        Self {
            version,
            events: PrefixEvents::new(records.map(leveled as Leveled)),
            stack: Vec::new(),
            failed: false,
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }
}

impl<I> Iterator for ModelParser<I>
where
    I: Iterator<Item = Result<Record>>,
{
    type Item = Result<Arc<Model>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.events.next()? {
                Ok((TreeEvent::Enter, record)) => {
                    let parent = self
                        .stack
                        .last_mut()
                        .map(|Frame { model, state }| Parent::new(model, state));
                    match parse_model(self.version, &record, parent) {
                        Ok(model) => {
                            let model = Arc::new(model);
                            self.stack.push(Frame {
                                model: Arc::clone(&model),
                                state: model.model_type.initial_state(),
                            });
                            return Some(Ok(model));
                        },
                        Err(e) => {
                            self.failed = true;
                            return Some(Err(e));
                        },
                    }
                },
                Ok((TreeEvent::Exit, _)) => {
                    self.stack.pop();
                },
                Err(e) => {
                    tracing::error!(error = %e, "record stream aborted");
                    self.failed = true;
                    return Some(Err(e));
                },
            }
        }
    }
}

/// Models of a record sequence, in stream order.
pub fn parse_models<I>(version: Version, records: I) -> ModelParser<I::IntoIter>
where
    I: IntoIterator<Item = Result<Record>>,
{
    ModelParser::new(version, records.into_iter())
}
