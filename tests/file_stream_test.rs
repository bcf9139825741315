use std::thread;

use resumable_stream::{
    ByteProducer, FileInputStream, FileInputStreamFactory, InputFilter, InputStream,
    InputStreamFactory, Status, StreamError,
};
use rstest::rstest;
use setup::{file_with, pattern, read_exactly, read_to_end};


struct PassThrough;

impl InputFilter for PassThrough {
    fn attach(self: Box<Self>, upstream: Box<dyn ByteProducer>) -> Box<dyn ByteProducer> {
        Box::new(PassThroughProducer(upstream))
    }
}

struct PassThroughProducer(Box<dyn ByteProducer>);

impl ByteProducer for PassThroughProducer {
    fn good(&self) -> bool {
        self.0.good()
    }

    fn status(&self) -> Status {
        self.0.status()
    }

    fn eos(&mut self) -> bool {
        self.0.eos()
    }

    fn avail(&mut self) -> u64 {
        self.0.avail()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        self.0.read(buf)
    }

    fn skip(&mut self, n: u64) -> u64 {
        self.0.skip(n)
    }

    fn putback(&mut self, n: u64) {
        self.0.putback(n)
    }
}

#[test]
fn resume_from_snapshot() {
    let data = pattern(100);
    let file = file_with(&data);

    let mut stream = FileInputStream::new(file.path(), 10);
    assert_eq!(90, stream.avail());
    assert_eq!(data[10..60], read_exactly(&mut stream, 50)[..]);
    assert_eq!(40, stream.avail());
    assert_eq!(60, stream.tell());

    let factory = stream.new_factory().unwrap();
    let mut resumed = factory.create();
    assert_eq!(40, resumed.avail());
    assert_eq!(
        read_exactly(&mut stream, 1),
        read_exactly(resumed.as_mut(), 1)
    );
    assert_eq!(data[61..], read_to_end(resumed.as_mut())[..]);
}

#[test]
fn missing_file_is_inert() {
    let dir = tempfile::tempdir().unwrap();
    let mut stream = FileInputStream::new(dir.path().join("missing.dcm"), 0);
    assert!(!stream.good());
    assert_eq!(0, stream.read(&mut [0; 32]));
    assert_eq!(0, stream.skip(32));
    assert!(stream.eos());
    assert_eq!(0, stream.avail());

    // The factory is still handed out: the failure is part of the stream it recreates.
    let factory = stream.new_factory().unwrap();
    assert!(!factory.create().good());
}

#[rstest]
#[case(0, 0)]
#[case(0, 17)]
#[case(5, 95)]
#[case(99, 1)]
fn snapshot_preserves_avail(#[case] offset: u64, #[case] consumed: u64) {
    let file = file_with(&pattern(100));
    let mut stream = FileInputStream::new(file.path(), offset);
    assert_eq!(consumed, stream.skip(consumed));

    let before = stream.avail();
    let mut resumed = stream.new_factory().unwrap().create();
    assert_eq!(before, resumed.avail());
    assert_eq!(stream.tell(), resumed.tell());
    assert_eq!(stream.eos(), resumed.eos());
}

#[test]
fn filter_blocks_snapshot() {
    let file = file_with(&pattern(20));
    let mut stream = FileInputStream::new(file.path(), 0);
    stream.install_filter(Box::new(PassThrough)).unwrap();
    assert!(stream.has_filter());
    assert!(stream.new_factory().is_none());
    assert_eq!(
        Err(StreamError::FilterAlreadyInstalled),
        stream.install_filter(Box::new(PassThrough))
    );
    assert_eq!(pattern(20), read_to_end(&mut stream));
}

#[test]
fn mark_and_putback() {
    let data = pattern(64);
    let file = file_with(&data);
    let mut stream = FileInputStream::new(file.path(), 8);
    stream.mark();
    let first = read_exactly(&mut stream, 16);
    stream.putback();
    assert!(stream.good());
    assert_eq!(8, stream.tell());
    assert_eq!(first, read_exactly(&mut stream, 16));
}

#[test]
fn factories_can_move_between_threads() {
    let data = pattern(4096);
    let file = file_with(&data);
    let factory = FileInputStreamFactory::new(file.path(), 1000);

    thread::scope(|s| {
        for _ in 0..4 {
            let factory = factory.clone_box();
            let expected = &data[1000..];
            s.spawn(move || {
                let mut stream = factory.create();
                assert_eq!(expected, &read_to_end(stream.as_mut())[..]);
            });
        }
    });
}
