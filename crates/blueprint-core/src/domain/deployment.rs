//! Deployment option catalogs, one per topology.
//!
//! Every topology owns its own option schema; the schemas overlap only in
//! `serviceDiscoveryType` and `monitoring`. Catalogs are `const` tables and the
//! resolver is a plain lookup over them.

use std::collections::BTreeSet;

use crate::domain::entities::application::{OptionMap, OptionValue};
use crate::domain::error::DomainError;
use crate::domain::value_objects::{
    DeploymentTopology, GatewayType, IngressType, KubernetesServiceType, MonitoringType,
    OpenshiftStorageType, ServiceDiscoveryType,
};

// ── Per-topology schemas ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockerComposeOptions {
    pub gateway_type: GatewayType,
    pub service_discovery_type: ServiceDiscoveryType,
    pub monitoring: MonitoringType,
}

/// Shared by kubernetes and minikube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KubernetesOptions {
    pub namespace: &'static str,
    pub service_type: KubernetesServiceType,
    pub storage_class_name: &'static str,
    pub storage_provisioner: &'static str,
    pub use_dynamic_storage: bool,
    pub ingress_domain: &'static str,
    pub ingress_type: IngressType,
    pub istio: bool,
    pub service_discovery_type: ServiceDiscoveryType,
    pub monitoring: MonitoringType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenshiftOptions {
    pub namespace: &'static str,
    pub storage_type: OpenshiftStorageType,
    pub registry_replicas: i64,
    pub service_discovery_type: ServiceDiscoveryType,
    pub monitoring: MonitoringType,
}

pub const DOCKER_COMPOSE_DEFAULTS: DockerComposeOptions = DockerComposeOptions {
    gateway_type: GatewayType::SpringCloudGateway,
    service_discovery_type: ServiceDiscoveryType::Consul,
    monitoring: MonitoringType::No,
};

pub const KUBERNETES_DEFAULTS: KubernetesOptions = KubernetesOptions {
    namespace: "default",
    service_type: KubernetesServiceType::LoadBalancer,
    storage_class_name: "",
    storage_provisioner: "",
    use_dynamic_storage: false,
    ingress_domain: "",
    ingress_type: IngressType::Nginx,
    istio: false,
    service_discovery_type: ServiceDiscoveryType::Consul,
    monitoring: MonitoringType::No,
};

pub const MINIKUBE_DEFAULTS: KubernetesOptions = KUBERNETES_DEFAULTS;

pub const OPENSHIFT_DEFAULTS: OpenshiftOptions = OpenshiftOptions {
    namespace: "default",
    storage_type: OpenshiftStorageType::Ephemeral,
    registry_replicas: 2,
    service_discovery_type: ServiceDiscoveryType::Consul,
    monitoring: MonitoringType::No,
};

/// Base option values shared by every full deployment record.
pub const DIRECTORY_PATH: &str = "../";
pub const DOCKER_PUSH_COMMAND: &str = "docker push";

// ── DeploymentOptions ─────────────────────────────────────────────────────────

/// Default options of one topology, typed per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentOptions {
    DockerCompose(DockerComposeOptions),
    Kubernetes(KubernetesOptions),
    Openshift(OpenshiftOptions),
    Minikube(KubernetesOptions),
}

impl DeploymentOptions {
    pub fn topology(&self) -> DeploymentTopology {
        match self {
            Self::DockerCompose(_) => DeploymentTopology::DockerCompose,
            Self::Kubernetes(_) => DeploymentTopology::Kubernetes,
            Self::Openshift(_) => DeploymentTopology::Openshift,
            Self::Minikube(_) => DeploymentTopology::Minikube,
        }
    }

    /// Option keys of this topology's schema, in schema order.
    pub fn schema(&self) -> &'static [&'static str] {
        schema_for(self.topology())
    }

    /// Flat option map holding exactly the keys of [`Self::schema`].
    pub fn fragment(&self) -> OptionMap {
        let mut map = OptionMap::new();
        let mut put = |key: &str, value: OptionValue| {
            map.insert(key.to_string(), value);
        };

        match self {
            Self::DockerCompose(o) => {
                put(GatewayType::OPTION, o.gateway_type.as_str().into());
                put(ServiceDiscoveryType::OPTION, o.service_discovery_type.as_str().into());
                put(MonitoringType::OPTION, o.monitoring.as_str().into());
            }
            Self::Kubernetes(o) | Self::Minikube(o) => {
                put("namespace", o.namespace.into());
                put(KubernetesServiceType::OPTION, o.service_type.as_str().into());
                put("storageClassName", o.storage_class_name.into());
                put("storageProvisioner", o.storage_provisioner.into());
                put("useDynamicStorage", o.use_dynamic_storage.into());
                put("ingressDomain", o.ingress_domain.into());
                put(IngressType::OPTION, o.ingress_type.as_str().into());
                put("istio", o.istio.into());
                put(ServiceDiscoveryType::OPTION, o.service_discovery_type.as_str().into());
                put(MonitoringType::OPTION, o.monitoring.as_str().into());
            }
            Self::Openshift(o) => {
                put("namespace", o.namespace.into());
                put(OpenshiftStorageType::OPTION, o.storage_type.as_str().into());
                put("registryReplicas", o.registry_replicas.into());
                put(ServiceDiscoveryType::OPTION, o.service_discovery_type.as_str().into());
                put(MonitoringType::OPTION, o.monitoring.as_str().into());
            }
        }
        map
    }
}

const DOCKER_COMPOSE_SCHEMA: &[&str] = &["gatewayType", "serviceDiscoveryType", "monitoring"];

const KUBERNETES_SCHEMA: &[&str] = &[
    "namespace",
    "serviceType",
    "storageClassName",
    "storageProvisioner",
    "useDynamicStorage",
    "ingressDomain",
    "ingressType",
    "istio",
    "serviceDiscoveryType",
    "monitoring",
];

const OPENSHIFT_SCHEMA: &[&str] = &[
    "namespace",
    "storageType",
    "registryReplicas",
    "serviceDiscoveryType",
    "monitoring",
];

pub fn schema_for(topology: DeploymentTopology) -> &'static [&'static str] {
    match topology {
        DeploymentTopology::DockerCompose => DOCKER_COMPOSE_SCHEMA,
        DeploymentTopology::Kubernetes | DeploymentTopology::Minikube => KUBERNETES_SCHEMA,
        DeploymentTopology::Openshift => OPENSHIFT_SCHEMA,
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────────

/// Maps topology tags to their default option sets.
pub struct DeploymentOptionsResolver;

impl DeploymentOptionsResolver {
    pub fn defaults(topology: DeploymentTopology) -> DeploymentOptions {
        match topology {
            DeploymentTopology::DockerCompose => {
                DeploymentOptions::DockerCompose(DOCKER_COMPOSE_DEFAULTS)
            }
            DeploymentTopology::Kubernetes => DeploymentOptions::Kubernetes(KUBERNETES_DEFAULTS),
            DeploymentTopology::Openshift => DeploymentOptions::Openshift(OPENSHIFT_DEFAULTS),
            DeploymentTopology::Minikube => DeploymentOptions::Minikube(MINIKUBE_DEFAULTS),
        }
    }

    /// Defaults for a raw tag; unknown tags get the docker-compose defaults.
    pub fn defaults_for_tag(raw: &str) -> DeploymentOptions {
        Self::defaults(Self::resolve_tag(raw))
    }

    pub fn resolve_tag(raw: &str) -> DeploymentTopology {
        DeploymentTopology::resolve(raw)
    }

    pub fn parse_tag(raw: &str) -> Result<DeploymentTopology, DomainError> {
        raw.parse()
    }

    pub fn config(topology: DeploymentTopology) -> DeploymentConfig {
        DeploymentConfig::new(Self::defaults(topology))
    }
}

// ── DeploymentConfig ──────────────────────────────────────────────────────────

/// A full deployment record: base options plus the topology fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub options: DeploymentOptions,
    pub apps_folders: BTreeSet<String>,
    pub clustered_db_apps: BTreeSet<String>,
    pub directory_path: String,
}

impl DeploymentConfig {
    pub fn new(options: DeploymentOptions) -> Self {
        Self {
            options,
            apps_folders: BTreeSet::new(),
            clustered_db_apps: BTreeSet::new(),
            directory_path: DIRECTORY_PATH.to_string(),
        }
    }

    pub fn topology(&self) -> DeploymentTopology {
        self.options.topology()
    }

    pub fn with_app_folder(mut self, folder: impl Into<String>) -> Self {
        self.apps_folders.insert(folder.into());
        self
    }

    pub fn with_clustered_db_app(mut self, app: impl Into<String>) -> Self {
        self.clustered_db_apps.insert(app.into());
        self
    }

    pub fn to_option_map(&self) -> OptionMap {
        let mut map = self.options.fragment();
        map.insert("appsFolders".into(), self.apps_folders.clone().into());
        map.insert("clusteredDbApps".into(), self.clustered_db_apps.clone().into());
        map.insert("directoryPath".into(), self.directory_path.clone().into());

        // Registry keys exist only outside docker-compose.
        if self.topology() != DeploymentTopology::DockerCompose {
            map.insert("dockerRepositoryName".into(), "".into());
            map.insert("dockerPushCommand".into(), DOCKER_PUSH_COMMAND.into());
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(map: &OptionMap) -> BTreeSet<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn kubernetes_fragment_is_complete() {
        let fragment = DeploymentOptionsResolver::defaults(DeploymentTopology::Kubernetes).fragment();

        assert_eq!(fragment.len(), 10);
        assert_eq!(keys(&fragment), KUBERNETES_SCHEMA.iter().copied().collect::<BTreeSet<_>>());
        assert_eq!(fragment["serviceDiscoveryType"], OptionValue::from("consul"));
        assert_eq!(fragment["monitoring"], OptionValue::from("no"));
        assert_eq!(fragment["istio"], OptionValue::Bool(false));
    }

    #[test]
    fn every_fragment_matches_its_schema() {
        for topology in DeploymentTopology::ALL {
            let options = DeploymentOptionsResolver::defaults(topology);
            let fragment = options.fragment();
            assert_eq!(
                keys(&fragment),
                options.schema().iter().copied().collect::<BTreeSet<_>>(),
                "{topology}"
            );
        }
    }

    #[test]
    fn openshift_defaults() {
        let options = DeploymentOptionsResolver::defaults(DeploymentTopology::Openshift);
        let DeploymentOptions::Openshift(openshift) = options else {
            panic!("expected openshift options, got {options:?}");
        };
        assert_eq!(openshift.storage_type, OpenshiftStorageType::Ephemeral);
        assert_eq!(options.fragment()["registryReplicas"], OptionValue::Number(2));
    }

    #[test]
    fn unknown_tag_falls_back_to_compose() {
        assert_eq!(
            DeploymentOptionsResolver::defaults_for_tag("not-a-real-topology"),
            DeploymentOptionsResolver::defaults(DeploymentTopology::DockerCompose)
        );
        assert!(DeploymentOptionsResolver::parse_tag("not-a-real-topology").is_err());
    }

    #[test]
    fn minikube_shares_kubernetes_schema() {
        let minikube = DeploymentOptionsResolver::defaults_for_tag("minikube");
        assert_eq!(minikube.topology(), DeploymentTopology::Minikube);
        assert_eq!(
            minikube.fragment(),
            DeploymentOptionsResolver::defaults(DeploymentTopology::Kubernetes).fragment()
        );
    }

    #[test]
    fn full_config_adds_registry_keys_outside_compose() {
        let compose = DeploymentOptionsResolver::config(DeploymentTopology::DockerCompose)
            .to_option_map();
        assert!(!compose.contains_key("dockerPushCommand"));
        assert_eq!(compose["directoryPath"], OptionValue::from("../"));
        assert_eq!(compose["appsFolders"], OptionValue::empty_set());

        let k8s = DeploymentOptionsResolver::config(DeploymentTopology::Kubernetes)
            .with_app_folder("store")
            .with_clustered_db_app("billing")
            .to_option_map();
        assert_eq!(k8s["dockerPushCommand"], OptionValue::from("docker push"));
        assert_eq!(k8s["appsFolders"].to_string(), "[store]");
        assert_eq!(k8s["clusteredDbApps"].to_string(), "[billing]");
    }
}
