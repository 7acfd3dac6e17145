#![allow(clippy::unwrap_used)]

use codec_gateway::{Codec, CompressionKind, Format, Payload};
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_encode_decode_heavy() {
    use std::sync::Arc;
    use tokio::task::JoinSet;

    let iterations = 200usize;
    let codec = Arc::new(Codec::default());
    let compressions = [None, Some(CompressionKind::Gzip), Some(CompressionKind::Brotli)];

    let mut tasks = JoinSet::new();
    for format in Format::ALL {
        for compression in compressions {
            let codec = codec.clone();
            tasks.spawn(async move {
                for i in 0..iterations {
                    let payload = json!({
                        "task": format!("{format}-{i}"),
                        "body": {"id": i, "blob": "x".repeat(i % 64)},
                    });
                    let artifact = codec.encode(&payload, format, compression).unwrap();
                    let decoded: Payload =
                        codec.decode(artifact, format, compression).await.unwrap();

                    if format == Format::Xml {
                        // two keys, so the payload sits under the default root
                        assert_eq!(decoded["root"]["task"][0], json!(format!("{format}-{i}")));
                    } else {
                        assert_eq!(decoded, payload);
                    }
                }
            });
        }
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_decodes_share_one_artifact() {
    use futures::future::join_all;

    let codec = Codec::default();
    let payload = json!({"user": {"name": "Carol", "roles": ["a", "b"]}});
    let artifact = codec.encode(&payload, Format::MessagePack, "brotli").unwrap();

    let decodes = (0..64)
        .map(|_| codec.decode::<Payload>(artifact.clone(), Format::MessagePack, "brotli"));
    for result in join_all(decodes).await {
        assert_eq!(result.unwrap(), payload);
    }
}
