//! Record bytes captured from real documents, shared by unit tests.

/// Table control of a 5.0.0.0 document; 4 trailing bytes follow the fields
pub const TABLE_CONTROL: &[u8] = b"G\x04\xc0\x02 lbt\x11#*\x08\x00\x00\x00\x00\x00\x00\
\x00\x00\x06\x9e\x00\x00D\x10\x00\x00\x00\x00\x00\x00\
\x1b\x01\x1b\x01\x1b\x01\x1b\x01\xed\xad\xa2V\x00\x00\
\x00\x00";

/// Table body of a 5.0.1.7 document
pub const TABLE_BODY: &[u8] = b"M\x08\xa0\x01\x06\x00\x00\x04\x02\x00\x02\x00\x00\x00\
\x8d\x00\x8d\x00\x8d\x00\x8d\x00\x02\x00\x02\x00\x01\
\x00\x00\x00";

/// Table cell list header, read without its table
pub const LIST_HEADER: &[u8] = b"H\x08`\x02\x01\x00\x00\x00 \x00\x00\x00\x00\x00\x00\x00\
\x01\x00\x01\x00\x03O\x00\x00\x1a\x01\x00\x00\x8d\x00\
\x8d\x00\x8d\x00\x8d\x00\x01\x00\x03O\x00\x00";

/// Table control, caption, body and one cell of a 5.0.1.7 document
pub const TABLE_CAPTION_CELL: &[u8] = b"G\x04\xc0\x02 lbt\x10#*(\x00\x00\x00\x00\x00\x00\x00\x00\
\x06\x9e\x00\x00\x04\n\x00\x00\x03\x00\x00\x00\x1b\x01R\
\x037\x02n\x04\n^\xc0V\x00\x00\x00\x00H\x08`\x01\x02\x00\
\x00\x00\x00\x00\x00\x00\x03\x00\x00\x008!\x00\x00R\x03\
\x06\x9e\x00\x00M\x08\xa0\x01\x06\x00\x00\x04\x02\x00\
\x02\x00\x00\x00\x8d\x00\x8d\x00\x8d\x00\x8d\x00\x02\x00\
\x02\x00\x01\x00\x00\x00H\x08`\x02\x01\x00\x00\x00 \x00\
\x00\x00\x00\x00\x00\x00\x01\x00\x01\x00\x03O\x00\x00\
\x1a\x01\x00\x00\x8d\x00\x8d\x00\x8d\x00\x8d\x00\x01\x00\
\x03O\x00\x00";

/// BinData record of an embedded `jpg`
pub const BIN_DATA: &[u8] = b"\x12\x04\xc0\x00\x01\x00\x02\x00\x03\x00j\x00p\x00g\x00";

/// Three line segments starting at characters 0, 51 and 103
pub const LINE_SEGS: &[u8] = b"\x00\x00\x00\x00\x48\x1e\x00\x00\xe8\x03\x00\x00\xe8\x03\x00\x00\
\x52\x03\x00\x00\x58\x02\x00\x00\xdc\x05\x00\x00\x3c\xa0\x00\x00\
\x00\x00\x06\x00\x33\x00\x00\x00\x88\x24\x00\x00\xe8\x03\x00\x00\
\xe8\x03\x00\x00\x52\x03\x00\x00\x58\x02\x00\x00\xdc\x05\x00\x00\
\x3c\xa0\x00\x00\x00\x00\x06\x00\x67\x00\x00\x00\xc8\x2a\x00\x00\
\xe8\x03\x00\x00\xe8\x03\x00\x00\x52\x03\x00\x00\x58\x02\x00\x00\
\xdc\x05\x00\x00\x3c\xa0\x00\x00\x00\x00\x06\x00";

/// Start of a section's first paragraph text: the section definition
/// control followed by the column definition code
pub const SECD_TEXT: &[u8] = b"\x02\x00dces\x00\x00\x00\x00\x00\x00\x00\x00\x02\x00\
\x02\x00dloc\x00\x00\x00\x00\x00\x00\x00\x00\x02\x00\
H\x00i\x00\r\x00";
