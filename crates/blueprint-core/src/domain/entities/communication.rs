//! Inter-application messaging links shared across an export batch.

use serde::{Deserialize, Serialize};

/// One client → server messaging link, optionally over a broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationLink {
    pub client: String,
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker: Option<String>,
}

impl CommunicationLink {
    pub fn new(client: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            server: server.into(),
            broker: None,
        }
    }

    pub fn via(mut self, broker: impl Into<String>) -> Self {
        self.broker = Some(broker.into());
        self
    }

    pub fn involves(&self, base_name: &str) -> bool {
        self.client == base_name || self.server == base_name
    }
}

/// The shared communication content handed to a multi-application export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationSet {
    #[serde(default)]
    pub communications: Vec<CommunicationLink>,
}

impl CommunicationSet {
    pub fn new(communications: Vec<CommunicationLink>) -> Self {
        Self { communications }
    }

    pub fn is_empty(&self) -> bool {
        self.communications.is_empty()
    }

    /// Descriptor for one application, or `None` if it takes part in no link.
    pub fn descriptor_for(&self, base_name: &str) -> Option<CommunicationDescriptor> {
        let communications: Vec<_> = self
            .communications
            .iter()
            .filter(|link| link.involves(base_name))
            .cloned()
            .collect();

        if communications.is_empty() {
            return None;
        }

        Some(CommunicationDescriptor {
            base_name: base_name.to_string(),
            communications,
        })
    }
}

/// Contents of the communication descriptor file written next to a config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationDescriptor {
    pub base_name: String,
    pub communications: Vec<CommunicationLink>,
}

impl CommunicationDescriptor {
    /// Broker of the first link that names one.
    pub fn broker(&self) -> Option<&str> {
        self.communications
            .iter()
            .find_map(|link| link.broker.as_deref())
    }
}
