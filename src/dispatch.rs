//! Routing of agent requests to their handlers.

use std::sync::Arc;

use log::{debug, error, warn};
use ssh_encoding::Decode;

use crate::codec::Frame;
use crate::identity::SigningIdentity;
use crate::proto::{Identity, ProtoError, Request, Response};
use crate::signer;

/// Answers requests on behalf of a single identity.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    identity: Arc<dyn SigningIdentity>,
    comment: String,
}

impl Dispatcher {
    /// Serve `identity`, listing it with `comment`.
    pub fn new(identity: Arc<dyn SigningIdentity>, comment: impl Into<String>) -> Self {
        Self {
            identity,
            comment: comment.into(),
        }
    }

    /// Decode `frame` and compute the response to send, if any.
    ///
    /// Unknown message types are answered with [`Response::Failure`].
    /// Malformed requests and failed signatures get no response at all.
    pub fn dispatch(&self, frame: &Frame) -> Option<Response> {
        match Request::decode(&mut frame.as_bytes()) {
            Ok(request) => self.handle(request),
            Err(ProtoError::UnsupportedCommand { command }) => {
                debug!("Unsupported request type {command}, answering with failure");
                Some(Response::Failure)
            }
            Err(e) => {
                warn!(
                    "Dropping malformed request of type {}; error = {}",
                    frame.message_type(),
                    e
                );
                None
            }
        }
    }

    /// Compute the response to a decoded request.
    pub fn handle(&self, request: Request) -> Option<Response> {
        match request {
            Request::RequestIdentities => {
                debug!("Listing identity");
                Some(Response::IdentitiesAnswer(vec![Identity {
                    pubkey: self.identity.public_key_blob().to_vec(),
                    comment: self.comment.clone(),
                }]))
            }
            Request::SignRequest(request) => {
                debug!(
                    "Signing {} bytes; flags = {:#x}",
                    request.data.len(),
                    request.flags
                );
                match signer::sign(&*self.identity, &request.data) {
                    Ok(signature) => Some(Response::SignResponse(signature)),
                    Err(e) => {
                        error!("Error while signing; error = {}", e);
                        None
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use hex_literal::hex;

    use super::*;
    use crate::codec::FrameCodec;
    use crate::identity::{stub::StubIdentity, KeyType};
    use crate::proto::{SignRequest, Signature};

    fn frame(bytes: &[u8]) -> Frame {
        FrameCodec::default()
            .decode_frame(&mut BytesMut::from(bytes))
            .expect("valid frame")
            .expect("complete frame")
    }

    fn dispatcher(identity: StubIdentity) -> (Arc<StubIdentity>, Dispatcher) {
        let identity = Arc::new(identity);
        let dispatcher = Dispatcher::new(identity.clone(), "test comment");
        (identity, dispatcher)
    }

    #[test]
    fn lists_the_identity() {
        let (_, dispatcher) = dispatcher(StubIdentity::new(KeyType::Rsa));
        assert_eq!(
            dispatcher.dispatch(&frame(&hex!("00000001 0b"))),
            Some(Response::IdentitiesAnswer(vec![Identity {
                pubkey: b"stub-key-blob".to_vec(),
                comment: "test comment".into(),
            }]))
        );
    }

    #[test]
    fn signs_requested_data() {
        let (identity, dispatcher) = dispatcher(StubIdentity::new(KeyType::Dsa));
        let response = dispatcher.handle(Request::SignRequest(SignRequest {
            pubkey: b"ignored".to_vec(),
            data: b"data".to_vec(),
            flags: 0,
        }));
        assert_eq!(
            response,
            Some(Response::SignResponse(Signature {
                algorithm: "ssh-dsa".into(),
                blob: b"atad".to_vec(),
            }))
        );
        assert_eq!(identity.calls(), [b"data".to_vec()]);
    }

    #[test]
    fn unknown_type_fails() {
        let (identity, dispatcher) = dispatcher(StubIdentity::new(KeyType::Rsa));
        assert_eq!(
            dispatcher.dispatch(&frame(&hex!("00000001 63"))),
            Some(Response::Failure)
        );
        assert!(identity.calls().is_empty());
    }

    #[test]
    fn truncated_sign_request_is_dropped() {
        let (identity, dispatcher) = dispatcher(StubIdentity::new(KeyType::Rsa));
        // key blob fine, data string claims 16 bytes but carries 2
        let bytes = hex!("0000000c 0d 00000001 6b 00000010 6461");
        assert_eq!(dispatcher.dispatch(&frame(&bytes)), None);
        assert!(identity.calls().is_empty());
    }

    #[test]
    fn failed_signature_is_dropped() {
        let (identity, dispatcher) = dispatcher(StubIdentity::new(KeyType::Rsa).failing());
        let response = dispatcher.handle(Request::SignRequest(SignRequest {
            pubkey: vec![],
            data: b"data".to_vec(),
            flags: 0,
        }));
        assert_eq!(response, None);
        assert_eq!(identity.calls().len(), 1);
    }
}
