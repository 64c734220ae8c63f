#![no_main]
use std::convert::Infallible;

use arbitrary::{Arbitrary, Unstructured};
use jsontoken::{ChunkSource, TokenStream, TokenizerOptions, tokenize};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

const MAX_DEPTH: usize = 4;

#[derive(Debug, Arbitrary)]
struct Input {
    lenient: bool,
    /// Chunk sizes in chars, reused cyclically. Zero counts as one.
    splits: Vec<u8>,
    pieces: Vec<Piece>,
}

#[derive(Debug, Arbitrary)]
enum Piece {
    Raw(String),
    Filler(Filler),
    Document(Document),
}

/// Text the lenient grammar skips or treats as a separator.
#[derive(Debug, Clone, Copy, Arbitrary)]
enum Filler {
    Space,
    Newline,
    LineComment,
    HashComment,
    BlockComment,
    Comma,
    Semicolon,
    NonExecutePrefix,
}

impl Filler {
    fn text(self) -> &'static str {
        match self {
            Filler::Space => " ",
            Filler::Newline => "\r\n",
            Filler::LineComment => "// line\n",
            Filler::HashComment => "# hash\n",
            Filler::BlockComment => "/* block **/",
            Filler::Comma => ",",
            Filler::Semicolon => ";",
            Filler::NonExecutePrefix => ")]}'\n",
        }
    }
}

#[derive(Debug)]
struct Document(Value);

impl<'a> Arbitrary<'a> for Document {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        value(u, 0).map(Document)
    }
}

fn value(u: &mut Unstructured<'_>, depth: usize) -> arbitrary::Result<Value> {
    let kinds = if depth >= MAX_DEPTH { 4 } else { 6 };
    Ok(match u.choose_index(kinds)? {
        0 => Value::Null,
        1 => Value::Bool(u.arbitrary()?),
        2 => Value::from(u.arbitrary::<f64>()?),
        3 => Value::String(u.arbitrary()?),
        4 => {
            let len = u.arbitrary_len::<u8>()?.min(8);
            let items = (0..len)
                .map(|_| value(u, depth + 1))
                .collect::<arbitrary::Result<_>>()?;
            Value::Array(items)
        }
        _ => {
            let len = u.arbitrary_len::<u8>()?.min(8);
            let mut members = Map::new();
            for _ in 0..len {
                members.insert(u.arbitrary()?, value(u, depth + 1)?);
            }
            Value::Object(members)
        }
    })
}

fn render(pieces: &[Piece]) -> String {
    let mut text = String::new();
    for piece in pieces {
        match piece {
            Piece::Raw(raw) => text.push_str(raw),
            Piece::Filler(filler) => text.push_str(filler.text()),
            Piece::Document(Document(doc)) => text.push_str(&doc.to_string()),
        }
    }
    text
}

fn chunks(text: &str, splits: &[u8]) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sizes = splits.iter().map(|&s| usize::from(s.max(1))).cycle();
    let mut rest = &chars[..];
    let mut out = Vec::new();
    while !rest.is_empty() {
        let size = sizes.next().unwrap_or(rest.len()).min(rest.len());
        let (head, tail) = rest.split_at(size);
        out.push(head.iter().collect());
        rest = tail;
    }
    out
}

fuzz_target!(|input: Input| {
    let options = if input.lenient {
        TokenizerOptions::lenient()
    } else {
        TokenizerOptions::strict()
    };
    let text = render(&input.pieces);

    let whole: Vec<_> = tokenize(&text, options).collect();
    if let Some(at) = whole.iter().position(Result::is_err) {
        assert_eq!(at + 1, whole.len(), "error is the last item");
    }

    let mut stream = TokenStream::new(ChunkSource::<Infallible>::new(), options);
    let mut chunked = Vec::new();
    for chunk in chunks(&text, &input.splits) {
        stream.source_mut().push_string(chunk);
        chunked.extend(stream.by_ref());
    }
    stream.source_mut().close();
    chunked.extend(stream.by_ref());

    assert!(stream.is_terminated());
    assert_eq!(whole, chunked);
});
