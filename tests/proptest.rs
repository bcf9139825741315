use proptest::prelude::*;
use resumable_stream::{ByteProducer, FileByteProducer, StreamError};
use setup::{file_with, pattern};


#[derive(Debug)]
struct ProducerParams {
    size: usize,
    offset: u64,
}

prop_compose! {
    fn get_size()(size in 0..4096usize) -> usize {
        size
    }
}

prop_compose! {
    fn producer_params()
        (size in get_size())
        (size in Just(size), offset in 0..=size as u64) -> ProducerParams {
        ProducerParams { size, offset }
    }
}

proptest! {
    #[test]
    fn offset_determines_avail(ProducerParams { size, offset } in producer_params()) {
        let file = file_with(&pattern(size));
        let mut producer = FileByteProducer::new(file.path(), offset);
        prop_assert!(producer.good());
        prop_assert_eq!(size as u64 - offset, producer.avail());
        prop_assert_eq!(offset == size as u64, producer.eos());
    }

    #[test]
    fn read_never_exceeds_avail(
        ProducerParams { size, offset } in producer_params(),
        reads in prop::collection::vec(0..512usize, 1..16),
    ) {
        let file = file_with(&pattern(size));
        let mut producer = FileByteProducer::new(file.path(), offset);
        let data = pattern(size);
        let mut position = offset as usize;

        for len in reads {
            let before = producer.avail();
            let mut buf = vec![0; len];
            let read = producer.read(&mut buf);
            prop_assert!(read as u64 <= before.min(len as u64));
            prop_assert_eq!(before - read as u64, producer.avail());
            prop_assert_eq!(&data[position..position + read], &buf[..read]);
            position += read;
        }
        prop_assert!(producer.good());
    }

    #[test]
    fn skip_then_putback_round_trips(
        ProducerParams { size, offset } in producer_params(),
        n in 0..5000u64,
    ) {
        let file = file_with(&pattern(size));
        let mut producer = FileByteProducer::new(file.path(), offset);
        let before = producer.avail();

        let skipped = producer.skip(n);
        prop_assert_eq!(n.min(before), skipped);
        prop_assert_eq!(before - skipped, producer.avail());

        producer.putback(skipped);
        prop_assert!(producer.good());
        prop_assert_eq!(before, producer.avail());
    }

    #[test]
    fn putback_past_start_fails_in_place(
        ProducerParams { size, offset } in producer_params(),
        extra in 1..100u64,
    ) {
        let file = file_with(&pattern(size));
        let mut producer = FileByteProducer::new(file.path(), offset);

        producer.putback(offset + extra);
        prop_assert_eq!(Err(StreamError::PutbackFailed), producer.status());
        prop_assert_eq!(Some(offset), producer.position());
        prop_assert!(producer.eos());
        prop_assert_eq!(0, producer.avail());
    }
}
