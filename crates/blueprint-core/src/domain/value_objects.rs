//! Domain value objects: topologies, relationship kinds and option enumerations.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Every option that used to be a "friendly name → technical value" lookup is a
//! closed enumeration here, with exactly one default and one string form.
//!
//! # Adding New Variants
//!
//! 1. Add the variant to the `closed_option!` invocation
//! 2. If it belongs to a deployment schema, update `deployment.rs`
//! 3. Done

use crate::domain::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A closed option enumeration: one default, one canonical string per value.
pub trait ClosedOption: Copy + Default + FromStr<Err = DomainError> + 'static {
    /// Option key this enumeration is the value set of.
    const KEY: &'static str;

    fn canonical(&self) -> &'static str;
}

/// Declares a closed option enumeration with its string forms and default.
///
/// Parsing is ASCII case-insensitive; the first listed string is canonical.
macro_rules! closed_option {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($option:literal) default $default:ident {
            $($variant:ident => $canonical:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Option key this enumeration is the value set of.
            pub const OPTION: &'static str = $option;

            /// Every variant, in declaration order.
            pub const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical),+
                }
            }

            /// Comma separated list of accepted values, for diagnostics.
            pub fn expected() -> String {
                Self::VARIANTS
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl ClosedOption for $name {
            const KEY: &'static str = $option;

            fn canonical(&self) -> &'static str {
                self.as_str()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::VARIANTS
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| DomainError::InvalidOptionValue {
                        option: Self::OPTION.to_string(),
                        value: s.to_string(),
                        expected: Self::expected(),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// ── Deployment option values ──────────────────────────────────────────────────

closed_option! {
    /// Service registry used by the deployed applications.
    pub enum ServiceDiscoveryType ("serviceDiscoveryType") default Consul {
        Eureka => "eureka",
        Consul => "consul",
        No => "no",
    }
}

closed_option! {
    /// Monitoring stack deployed next to the applications.
    pub enum MonitoringType ("monitoring") default No {
        No => "no",
        Prometheus => "prometheus",
    }
}

closed_option! {
    /// How Kubernetes-family topologies expose services.
    pub enum KubernetesServiceType ("serviceType") default LoadBalancer {
        LoadBalancer => "LoadBalancer",
        NodePort => "NodePort",
        Ingress => "Ingress",
    }
}

closed_option! {
    /// Ingress controller flavour.
    pub enum IngressType ("ingressType") default Nginx {
        Nginx => "nginx",
        Gke => "gke",
    }
}

closed_option! {
    /// OpenShift volume lifetime.
    pub enum OpenshiftStorageType ("storageType") default Ephemeral {
        Ephemeral => "ephemeral",
        Persistent => "persistent",
    }
}

closed_option! {
    /// API gateway used by docker-compose deployments.
    pub enum GatewayType ("gatewayType") default SpringCloudGateway {
        SpringCloudGateway => "SpringCloudGateway",
    }
}

// ── Entity option values ──────────────────────────────────────────────────────

closed_option! {
    /// DTO mapping strategy.
    pub enum DtoMapper ("dto") default No {
        No => "no",
        Mapstruct => "mapstruct",
    }
}

closed_option! {
    /// Service layer shape.
    pub enum ServiceKind ("service") default No {
        No => "no",
        ServiceClass => "serviceClass",
        ServiceImpl => "serviceImpl",
    }
}

closed_option! {
    /// Pagination style for list endpoints.
    pub enum PaginationKind ("pagination") default No {
        No => "no",
        Pagination => "pagination",
        InfiniteScroll => "infinite-scroll",
    }
}

closed_option! {
    /// Search engine integration.
    pub enum SearchEngine ("search") default No {
        No => "no",
        Elasticsearch => "elasticsearch",
    }
}

// ── RelationshipKind ──────────────────────────────────────────────────────────

/// Cardinality of one directional relationship reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }

    /// Keyword used in `relationship <Keyword> { .. }` declarations.
    pub const fn dsl_keyword(&self) -> &'static str {
        match self {
            Self::OneToOne => "OneToOne",
            Self::OneToMany => "OneToMany",
            Self::ManyToOne => "ManyToOne",
            Self::ManyToMany => "ManyToMany",
        }
    }

    /// The kind seen from the other end of the same relationship.
    pub const fn inverse(self) -> Self {
        match self {
            Self::OneToMany => Self::ManyToOne,
            Self::ManyToOne => Self::OneToMany,
            other => other,
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DeploymentTopology ────────────────────────────────────────────────────────

/// A supported deployment target.
///
/// Raw tags are parsed exactly once, at the boundary, by [`FromStr`] (strict)
/// or [`DeploymentTopology::resolve`] (falls back to docker-compose).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentTopology {
    DockerCompose,
    Kubernetes,
    Openshift,
    Minikube,
}

impl DeploymentTopology {
    pub const ALL: [Self; 4] = [
        Self::DockerCompose,
        Self::Kubernetes,
        Self::Openshift,
        Self::Minikube,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DockerCompose => "docker-compose",
            Self::Kubernetes => "kubernetes",
            Self::Openshift => "openshift",
            Self::Minikube => "minikube",
        }
    }

    /// Lenient parse used wherever an unknown tag must not fail.
    ///
    /// Unknown tags resolve to [`DeploymentTopology::DockerCompose`]. Callers
    /// that need strict validation compare the requested tag against
    /// `raw.parse::<DeploymentTopology>()` instead.
    pub fn resolve(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::DockerCompose)
    }

    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DeploymentTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentTopology {
    type Err = DomainError;

    /// Case folding plus separator stripping: `Docker-Compose`,
    /// `docker_compose` and `dockerCompose` are the same tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "dockercompose" | "compose" => Ok(Self::DockerCompose),
            "kubernetes" | "k8s" => Ok(Self::Kubernetes),
            "openshift" => Ok(Self::Openshift),
            "minikube" => Ok(Self::Minikube),
            _ => Err(DomainError::UnknownDeploymentTopology {
                tag: s.to_string(),
                expected: Self::expected(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topology_parse_normalizes_tags() {
        assert_eq!(
            "dockerCompose".parse::<DeploymentTopology>().unwrap(),
            DeploymentTopology::DockerCompose
        );
        assert_eq!(
            "Docker_Compose".parse::<DeploymentTopology>().unwrap(),
            DeploymentTopology::DockerCompose
        );
        assert_eq!(
            "K8S".parse::<DeploymentTopology>().unwrap(),
            DeploymentTopology::Kubernetes
        );
        assert!("swarm".parse::<DeploymentTopology>().is_err());
    }

    #[test]
    fn topology_resolve_falls_back_to_compose() {
        assert_eq!(
            DeploymentTopology::resolve("not-a-real-topology"),
            DeploymentTopology::DockerCompose
        );
        assert_eq!(
            DeploymentTopology::resolve("openshift"),
            DeploymentTopology::Openshift
        );
    }

    #[test]
    fn relationship_inverse() {
        assert_eq!(
            RelationshipKind::OneToMany.inverse(),
            RelationshipKind::ManyToOne
        );
        assert_eq!(
            RelationshipKind::ManyToMany.inverse(),
            RelationshipKind::ManyToMany
        );
    }

    #[test]
    fn relationship_kind_serde_is_kebab() {
        let json = serde_json::to_string(&RelationshipKind::ManyToOne).unwrap();
        assert_eq!(json, "\"many-to-one\"");
    }

    #[test]
    fn closed_option_defaults() {
        assert_eq!(ServiceDiscoveryType::default(), ServiceDiscoveryType::Consul);
        assert_eq!(MonitoringType::default(), MonitoringType::No);
        assert_eq!(OpenshiftStorageType::default().as_str(), "ephemeral");
    }

    #[test]
    fn closed_option_parse_is_case_insensitive() {
        assert_eq!(
            "MapStruct".parse::<DtoMapper>().unwrap(),
            DtoMapper::Mapstruct
        );
        let err = "graphql".parse::<DtoMapper>().unwrap_err();
        assert!(err.to_string().contains("dto"));
        assert!(err.to_string().contains("mapstruct"));
    }

    #[test]
    fn closed_option_serde_uses_canonical_string() {
        let json = serde_json::to_string(&KubernetesServiceType::NodePort).unwrap();
        assert_eq!(json, "\"NodePort\"");
        let back: PaginationKind = serde_json::from_str("\"infinite-scroll\"").unwrap();
        assert_eq!(back, PaginationKind::InfiniteScroll);
    }
}
