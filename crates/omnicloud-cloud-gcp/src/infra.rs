//! Cloud DNS zone with primary/backup CNAME records
//!
//! `www.<domain>` points at the primary origin and `backup.<domain>` at the
//! backup origin. The backup record has a short TTL so that switching it
//! propagates quickly. The domain must be delegated to `name_servers` at the
//! registrar before any of this resolves publicly.

use omnicloud_cloud::{
    CloudError, ComponentResource, Output, Resource, ResourceOptions, Result, Stack,
};
use omnicloud_naming::{CnameRecord, DomainName};
use serde_json::{Value, json};

pub const COMPONENT_TYPE: &str = "omnicloud:gcp:GcpInfra";

pub const MANAGED_ZONE: &str = "gcp:dns/managedZone:ManagedZone";
pub const RECORD_SET: &str = "gcp:dns/recordSet:RecordSet";

pub const PRIMARY_LABEL: &str = "www";
pub const BACKUP_LABEL: &str = "backup";

pub const DEFAULT_PRIMARY_TTL: u32 = 300;
pub const DEFAULT_BACKUP_TTL: u32 = 60;

#[derive(Debug, Clone)]
pub struct GcpInfraArgs {
    /// Zone apex, with or without the trailing dot
    pub domain_name: String,

    /// CNAME target of `www`, usually the CloudFront domain
    pub primary_target: Output<String>,

    /// CNAME target of `backup`; no backup record without it
    pub backup_target: Option<Output<String>>,

    pub primary_ttl: u32,
    pub backup_ttl: u32,
}

impl GcpInfraArgs {
    pub fn new(domain_name: impl Into<String>, primary_target: impl Into<Output<String>>) -> Self {
        Self {
            domain_name: domain_name.into(),
            primary_target: primary_target.into(),
            backup_target: None,
            primary_ttl: DEFAULT_PRIMARY_TTL,
            backup_ttl: DEFAULT_BACKUP_TTL,
        }
    }

    pub fn with_backup(mut self, backup_target: impl Into<Output<String>>) -> Self {
        self.backup_target = Some(backup_target.into());
        self
    }
}

/// The GCP part of the deployment: DNS in front of both origins
#[derive(Debug, Clone)]
pub struct GcpInfra {
    pub component: ComponentResource,
    pub zone: Resource,
    pub primary_record: Resource,
    pub backup_record: Option<Resource>,

    /// Dot-terminated zone name
    pub dns_name: DomainName,

    /// Name servers to delegate the domain to
    pub name_servers: Output<Vec<String>>,
}

impl GcpInfra {
    pub fn new(stack: &mut Stack, name: &str, args: GcpInfraArgs) -> Result<Self> {
        let dns_name = DomainName::parse(&args.domain_name)?;
        for (label, ttl) in [
            (PRIMARY_LABEL, args.primary_ttl),
            (BACKUP_LABEL, args.backup_ttl),
        ] {
            if ttl == 0 {
                return Err(CloudError::InvalidConfig(format!(
                    "TTL of the {label} record must be positive"
                )));
            }
        }

        let component = stack.component(COMPONENT_TYPE, name)?;
        let child = ResourceOptions::child_of(&component);

        let zone_name = format!("{name}-zone");
        let zone = stack.declare(
            MANAGED_ZONE,
            &zone_name,
            json!({
                "name": &zone_name,
                "dnsName": dns_name.as_str(),
                "description": format!("Managed zone for {name} (failover)"),
            }),
            child.clone(),
        )?;
        let managed_zone = zone.output_str("name");

        let primary_record = stack.declare(
            RECORD_SET,
            &format!("{name}-{PRIMARY_LABEL}"),
            record_args(
                PRIMARY_LABEL,
                dns_name.as_str(),
                &args.primary_target,
                &managed_zone,
                args.primary_ttl,
            ),
            child.clone(),
        )?;

        let backup_record = match &args.backup_target {
            Some(target) => Some(stack.declare(
                RECORD_SET,
                &format!("{name}-{BACKUP_LABEL}"),
                record_args(
                    BACKUP_LABEL,
                    dns_name.as_str(),
                    target,
                    &managed_zone,
                    args.backup_ttl,
                ),
                child,
            )?),
            None => {
                tracing::debug!("No backup target for {}; skipping backup record", name);
                None
            }
        };

        let name_servers = zone.output_strings("nameServers");

        Ok(Self {
            component,
            zone,
            primary_record,
            backup_record,
            dns_name,
            name_servers,
        })
    }
}

/// Record-set arguments for `label.domain` → `target`, validated once the
/// target is known
fn record_args(
    label: &'static str,
    domain: &str,
    target: &Output<String>,
    managed_zone: &Output<String>,
    ttl: u32,
) -> Output<Value> {
    let domain = domain.to_string();
    target
        .zip(managed_zone)
        .try_apply(move |(target, managed_zone)| {
            let record = CnameRecord::for_label(label, &domain, &target)?;
            Ok::<_, CloudError>(json!({
                "name": record.name().as_str(),
                "managedZone": managed_zone,
                "type": "CNAME",
                "ttl": ttl,
                "rrdatas": record.rrdatas(),
            }))
        })
}
