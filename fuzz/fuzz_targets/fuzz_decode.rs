#![no_main]

use codec_gateway::{Artifact, Codec, Format, Payload};
use futures::executor::block_on;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = Codec::default();

    for format in Format::ALL {
        let _ = block_on(codec.decode::<Payload>(Artifact::from(data), format, false));
        let _ = block_on(codec.decode::<Payload>(Artifact::from(data), format, "gzip"));
        let _ = block_on(codec.decode::<Payload>(Artifact::from(data), format, "brotli"));
    }

    if let Ok(text) = std::str::from_utf8(data) {
        // Anything XML accepts must encode again
        if let Ok(tree) = block_on(codec.decode::<Payload>(text, Format::Xml, false)) {
            if tree.is_object() {
                let _ = codec.encode(&tree, Format::Xml, false);
            }
        }
        let _ = block_on(codec.decode::<Payload>(text, Format::Json, false));
    }
});
