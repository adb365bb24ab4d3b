//! Reads Hessian-encoded bytes from a file (or stdin) and prints the
//! decoded value.
//!
//! ```text
//! hessian-decode path/to/value.hessian
//! cat value.hessian | hessian-decode
//! ```
//!
//! Input is fed to the decoder in small fixed-size chunks rather than
//! all at once, to exercise incremental feeding the way a real caller
//! streaming off a socket would.

use std::collections::HashSet;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use hessian_core::Value;
use hessian_decoder::Decoder;

/// Bytes fed to the decoder per `feed()` call. Small enough to
/// meaningfully exercise incremental parsing on modest inputs without
/// making large files glacially slow to decode.
const FEED_CHUNK_SIZE: usize = 64;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let input = match read_input() {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("hessian-decode: {err}");
            return ExitCode::FAILURE;
        }
    };

    match decode(&input) {
        Ok(value) => {
            println!("{}", render(&value));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("hessian-decode: decode failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_input() -> io::Result<Vec<u8>> {
    match env::args().nth(1) {
        Some(path) => fs::read(path),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn decode(bytes: &[u8]) -> hessian_core::Result<Value> {
    let mut decoder = Decoder::new();
    for chunk in bytes.chunks(FEED_CHUNK_SIZE) {
        decoder.feed(chunk)?;
    }
    decoder.finalize()
}

/// A cycle-safe pretty-printer. [`Value`]'s own `Debug` impl
/// deliberately only prints composite *shape* (it must not recurse
/// into a self-referential graph); this renders full contents while
/// still terminating on a cycle, by tracking which composite
/// allocations are already being printed on the current path.
fn render(value: &Value) -> String {
    let mut out = String::new();
    let mut in_progress = HashSet::new();
    render_into(value, &mut out, &mut in_progress);
    out
}

fn render_into(value: &Value, out: &mut String, in_progress: &mut HashSet<usize>) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Long(l) => {
            let _ = write!(out, "{l}L");
        }
        Value::Double(d) => {
            let _ = write!(out, "{d}");
        }
        Value::String(s) => {
            let _ = write!(out, "{s:?}");
        }
        Value::Binary(b) => {
            let _ = write!(out, "<{} bytes>", b.len());
        }
        Value::Date(d) => {
            let _ = write!(out, "{d}");
        }
        Value::Vector(items) => {
            let ptr = std::rc::Rc::as_ptr(items) as usize;
            if !in_progress.insert(ptr) {
                out.push_str("<cycle>");
                return;
            }
            out.push('[');
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(item, out, in_progress);
            }
            out.push(']');
            in_progress.remove(&ptr);
        }
        Value::Map(map) => {
            let ptr = std::rc::Rc::as_ptr(map) as usize;
            if !in_progress.insert(ptr) {
                out.push_str("<cycle>");
                return;
            }
            out.push('{');
            for (i, (k, v)) in map.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(k, out, in_progress);
                out.push_str(": ");
                render_into(v, out, in_progress);
            }
            out.push('}');
            in_progress.remove(&ptr);
        }
        Value::Object(obj) => {
            let ptr = std::rc::Rc::as_ptr(obj) as usize;
            if !in_progress.insert(ptr) {
                out.push_str("<cycle>");
                return;
            }
            let obj_ref = obj.borrow();
            let _ = write!(out, "{}{{", obj_ref.class_name);
            for (i, (k, v)) in obj_ref.fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{k}: ");
                render_into(v, out, in_progress);
            }
            out.push('}');
            drop(obj_ref);
            in_progress.remove(&ptr);
        }
    }
}
