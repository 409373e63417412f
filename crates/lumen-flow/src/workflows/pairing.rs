//! Device pairing workflows.

use tracing::{info, warn};

use lumen_core::{PairingEvent, PairingLink};

use super::Workflows;

const CATEGORY: &str = "Pairing";

impl Workflows {
    /// Runs one pairing handshake for `public_key`.
    ///
    /// The store sees `Started` before the node is asked, and exactly one of
    /// `Succeeded`/`Failed` after it answers.
    pub async fn pair_device(&self, public_key: String) {
        self.stores.apply_pairing(PairingEvent::Started {
            public_key: public_key.clone(),
        });

        match self.collaborators.node.pair_device(&public_key).await {
            Ok(()) => {
                info!(public_key = %public_key, "Device paired");
                self.stores
                    .apply_pairing(PairingEvent::Succeeded { public_key });
            }
            Err(e) => {
                warn!(public_key = %public_key, error = %e, "Pairing failed");
                self.collaborators
                    .diagnostics
                    .log_event(CATEGORY, &e.to_string(), true);
                self.stores.apply_pairing(PairingEvent::Failed { public_key });
            }
        }
    }

    /// Starts a handshake from a pairing deep link.
    pub async fn pair_from_link(&self, link: &str) {
        match PairingLink::parse(link) {
            Ok(parsed) => {
                info!(code = %parsed.code, peer_id = ?parsed.peer_id, "Pairing link opened");
                self.pair_device(parsed.public_key).await;
            }
            Err(e) => {
                warn!(error = %e, "Rejected pairing link");
                self.collaborators
                    .diagnostics
                    .log_event(CATEGORY, &e.to_string(), true);
            }
        }
    }
}
