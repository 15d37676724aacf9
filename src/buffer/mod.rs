//! Cursor-based readers and writers over caller-supplied byte slices.
//!
//! Grounded on the teacher's `utils::buffer_reader::BuffReader`/`utils::buffer_writer::BuffWriter`
//! pair, trimmed of MQTT5 property encoding (this crate targets 3.1.1 only) and adapted so a
//! writer that runs out of room reports it rather than panicking, matching the "return 0, not an
//! error" contract the per-packet codecs need.

mod reader;
mod writer;

pub use reader::BufReader;
pub use writer::BufWriter;
