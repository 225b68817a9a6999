#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use ssh_agent_forward::codec::FrameCodec;

fuzz_target!(|data: &[u8]| {
    // first byte picks the capacity, the rest is the received stream
    let Some((&capacity, stream)) = data.split_first() else {
        return;
    };
    let codec = FrameCodec::new(capacity as usize * 16);
    let mut buffer = BytesMut::from(stream);
    while let Ok(Some(frame)) = codec.decode_frame(&mut buffer) {
        assert!(frame.as_bytes().len() + 4 <= codec.capacity());
    }
});
