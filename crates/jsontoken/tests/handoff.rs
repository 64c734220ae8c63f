#![expect(missing_docs)]

use std::thread;

use jsontoken::{
    Demand, Progress, StreamError, Token, TokenEvent, TokenSink, TokenStream, TokenizerOptions,
    handoff::{self, ChannelSource},
    tokenize,
};

#[derive(Default)]
struct Collect<E> {
    events: Vec<TokenEvent>,
    errors: Vec<StreamError<E>>,
    completed: bool,
    cancel_after: Option<usize>,
}

impl<E> TokenSink<E> for Collect<E> {
    fn on_event(&mut self, event: TokenEvent, demand: &mut Demand) {
        self.events.push(event);
        if self.cancel_after == Some(self.events.len()) {
            demand.cancel();
        }
    }

    fn on_complete(&mut self) {
        self.completed = true;
    }

    fn on_error(&mut self, error: StreamError<E>) {
        self.errors.push(error);
    }
}

/// Requests everything and parks on the channel whenever input runs dry.
fn run_to_end<E>(stream: &mut TokenStream<ChannelSource<E>>, sink: &mut Collect<E>) -> Progress {
    let mut progress = stream.request(u64::MAX, sink);
    while progress == Progress::Starved {
        stream.source_mut().wait_ready();
        progress = stream.drive(sink);
    }
    progress
}

fn tokens(events: &[TokenEvent]) -> Vec<Token> {
    events.iter().map(|e| e.token.clone()).collect()
}

#[test]
fn producer_thread_feeds_the_tokenizer() {
    let document = r#"{"tool":"search","args":{"query":"rust","limit":10,"tags":["a","b"]}}"#;
    let (tx, rx) = handoff::channel::<String>();

    let producer = thread::spawn(move || {
        let chars: Vec<char> = document.chars().collect();
        for piece in chars.chunks(7) {
            let piece: String = piece.iter().collect();
            assert!(tx.send_str(&piece));
            thread::yield_now();
        }
        tx.close();
    });

    let mut stream = TokenStream::new(rx, TokenizerOptions::strict());
    let mut sink = Collect::default();
    assert_eq!(run_to_end(&mut stream, &mut sink), Progress::Finished);
    producer.join().unwrap();

    let expected: Vec<TokenEvent> = tokenize(document, TokenizerOptions::strict())
        .map(Result::unwrap)
        .collect();
    assert_eq!(sink.events, expected);
    assert!(sink.completed);
    assert!(sink.errors.is_empty());
}

#[test]
fn producer_failure_reaches_the_sink() {
    let (tx, rx) = handoff::channel::<&'static str>();
    let producer = thread::spawn(move || {
        tx.send_str("[1,");
        tx.fail("socket closed");
        assert!(!tx.send('2'));
    });

    let mut stream = TokenStream::new(rx, TokenizerOptions::strict());
    let mut sink = Collect::default();
    assert_eq!(run_to_end(&mut stream, &mut sink), Progress::Finished);
    producer.join().unwrap();

    assert_eq!(
        tokens(&sink.events),
        [Token::ArrayStart, Token::Number("1".into())]
    );
    assert_eq!(sink.errors, [StreamError::Upstream("socket closed")]);
    assert!(!sink.completed);
}

#[test]
fn consumer_cancel_is_visible_to_the_producer() {
    let (tx, rx) = handoff::channel::<()>();
    assert!(tx.send_str("[1,2,3]"));

    let mut stream = TokenStream::new(rx, TokenizerOptions::strict());
    let mut sink = Collect {
        cancel_after: Some(1),
        ..Collect::default()
    };
    assert_eq!(stream.request(10, &mut sink), Progress::Finished);

    assert_eq!(tokens(&sink.events), [Token::ArrayStart]);
    assert!(tx.is_cancelled());
    assert!(!tx.send(' '));
    assert!(!sink.completed);
}

#[test]
fn dropping_the_sender_ends_input() {
    let (tx, rx) = handoff::channel::<()>();
    tx.send_str("true");
    drop(tx);

    let mut stream = TokenStream::new(rx, TokenizerOptions::strict());
    let items: Vec<_> = stream.by_ref().map(Result::unwrap).collect();
    assert_eq!(tokens(&items), [Token::Boolean(true), Token::DocumentEnd]);
    assert!(stream.is_terminated());
}
