//! Reacts to a streamed tool call while it is still arriving.
//!
//! The assistant's response is a JSON object whose `moderation.decision`
//! member comes first. The sink below watches event paths: it stops the
//! stream as soon as the decision is `"block"`, and otherwise prints the
//! `code` member the moment its string token completes.
//!
//! Demand is granted one event at a time, so nothing past the event the
//! sink is looking at has been read from the source.
//!
//! Run with
//!
//! ```bash
//! cargo run -p jsontoken --example stream_paths
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use std::convert::Infallible;

use jsontoken::{
    ChunkSource, Demand, Progress, StreamError, Token, TokenEvent, TokenSink, TokenStream,
    TokenizerOptions, path,
};

#[derive(Default)]
struct Watcher {
    blocked: bool,
    done: bool,
}

impl TokenSink<Infallible> for Watcher {
    fn on_event(&mut self, event: TokenEvent, demand: &mut Demand) {
        match event.token {
            Token::String(decision) if event.path == path!["moderation", "decision"] => {
                println!("moderation decision: {decision}");
                if decision == "block" {
                    self.blocked = true;
                    demand.cancel();
                    return;
                }
            }
            Token::String(code) if event.path == path!["code"] => {
                println!("--- code ---\n{code}");
            }
            _ => {}
        }
        demand.request(1);
    }

    fn on_complete(&mut self) {
        self.done = true;
    }

    fn on_error(&mut self, error: StreamError<Infallible>) {
        eprintln!("stream failed: {error}");
        self.done = true;
    }
}

fn main() {
    // In real life these would come from the network.
    let simulated_stream: [&str; 8] = [
        r#"{"moderation":{"decision":"al"#,
        r#"low","reason":null},"#,
        r#""filename":"example.rs","#,
        r#""language":"rust","#,
        r#""code":"use jsontoken::tokenize;\n"#,
        r#"fn main() {\n    let _ = tokenize(\"[]\", "#,
        r#"Default::default());\n}\n"#,
        r#""}"#,
    ];

    let mut stream = TokenStream::new(ChunkSource::new(), TokenizerOptions::strict());
    let mut watcher = Watcher::default();
    let mut progress = stream.request(1, &mut watcher);

    for chunk in simulated_stream {
        if progress == Progress::Finished {
            break;
        }
        stream.source_mut().push_str(chunk);
        progress = stream.drive(&mut watcher);
    }
    stream.source_mut().close();
    stream.drive(&mut watcher);

    if watcher.blocked {
        eprintln!("content blocked; the rest of the response was never read");
    } else if !watcher.done {
        eprintln!("stream ended before the document was complete");
    }
}
