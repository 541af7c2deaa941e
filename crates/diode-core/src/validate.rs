// ── Schema validation ──
//
// Field-level rules for requests and every record kind. Both sides run the
// same rules: the SDK before sending, the distributor on receipt. Violations
// are collected, not short-circuited, and rendered as `path: message`.

use std::fmt;
use std::net::IpAddr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use diode_api::proto::v1 as pb;

use crate::model::{
    AnyRef, AssignedObject, Device, DeviceType, Entity, EntityData, IngestRequest, Interface,
    IpAddress, Manufacturer, Platform, Resource, ResourceKind, Role, Site, Tag,
};

/// Upper bound on entities per request.
pub const MAX_ENTITIES: usize = 1000;

pub const IP_ROLES: &[&str] = &[
    "loopback", "secondary", "anycast", "vip", "vrrp", "hsrp", "glbp", "carp",
];
pub const IP_STATUSES: &[&str] = &["active", "reserved", "deprecated", "dhcp", "slaac"];
pub const SITE_STATUSES: &[&str] = &["planned", "staging", "active", "decommissioning", "retired"];
pub const DEVICE_STATUSES: &[&str] = &[
    "offline",
    "active",
    "planned",
    "staged",
    "failed",
    "inventory",
    "decommissioning",
];
pub const INTERFACE_MODES: &[&str] = &["access", "tagged", "tagged-all"];

static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9])+\.([0-9])+\.([0-9])+$").expect("valid regex"));
static DNS_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Za-z_-]+|\*)(\.[0-9A-Za-z_-]+)*\.?$").expect("valid regex")
});
static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));
static COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{6}$").expect("valid regex"));
static MAC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").expect("valid regex")
});

/// One broken rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted field path, e.g. `entities[0].device.name`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

// ── Checker ─────────────────────────────────────────────────────────

struct Checker {
    now: DateTime<Utc>,
    violations: Vec<Violation>,
}

impl Checker {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            violations: Vec::new(),
        }
    }

    fn fail(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            path: path.into(),
            message: message.into(),
        });
    }

    fn length(&mut self, path: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            let message = if min == 0 {
                format!("must be at most {max} characters")
            } else {
                format!("must be between {min} and {max} characters")
            };
            self.fail(path, message);
        }
    }

    /// Empty is always allowed: it means "unset".
    fn one_of(&mut self, path: &str, value: &str, allowed: &[&str]) {
        if !value.is_empty() {
            self.required_one_of(path, value, allowed);
        }
    }

    fn required_one_of(&mut self, path: &str, value: &str, allowed: &[&str]) {
        if !allowed.contains(&value) {
            self.fail(path, format!("must be one of [{}]", allowed.join(", ")));
        }
    }

    fn pattern(&mut self, path: &str, value: &str, re: &Regex) {
        if !value.is_empty() && !re.is_match(value) {
            self.fail(path, format!("must match pattern {}", re.as_str()));
        }
    }

    fn range(&mut self, path: &str, value: i32, min: i32, max: i32) {
        if !(min..=max).contains(&value) {
            self.fail(path, format!("must be between {min} and {max}"));
        }
    }

    fn slug(&mut self, path: &str, value: &str) {
        self.length(path, value, 0, 100);
        self.pattern(path, value, &SLUG);
    }

    fn tags(&mut self, path: &str, tags: &[Tag]) {
        for (i, tag) in tags.iter().enumerate() {
            tag.check(&format!("{path}[{i}]"), self);
        }
    }

    fn finish(self) -> Result<(), Vec<Violation>> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }
}

trait Check {
    fn check(&self, path: &str, c: &mut Checker);
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_owned()
    } else {
        format!("{path}.{field}")
    }
}

// ── Records ─────────────────────────────────────────────────────────

impl Check for Tag {
    fn check(&self, path: &str, c: &mut Checker) {
        c.length(&join(path, "name"), &self.name, 1, 100);
        c.length(&join(path, "slug"), &self.slug, 1, 100);
        c.pattern(&join(path, "slug"), &self.slug, &SLUG);
        c.pattern(&join(path, "color"), &self.color, &COLOR);
    }
}

impl Check for Manufacturer {
    fn check(&self, path: &str, c: &mut Checker) {
        c.length(&join(path, "name"), &self.name, 1, 100);
        c.slug(&join(path, "slug"), &self.slug);
        c.length(&join(path, "description"), &self.description, 0, 200);
        c.tags(&join(path, "tags"), &self.tags);
    }
}

impl Check for Platform {
    fn check(&self, path: &str, c: &mut Checker) {
        c.length(&join(path, "name"), &self.name, 1, 100);
        c.slug(&join(path, "slug"), &self.slug);
        if let Some(manufacturer) = &self.manufacturer {
            manufacturer.check(&join(path, "manufacturer"), c);
        }
        c.length(&join(path, "description"), &self.description, 0, 200);
        c.tags(&join(path, "tags"), &self.tags);
    }
}

impl Check for Role {
    fn check(&self, path: &str, c: &mut Checker) {
        c.length(&join(path, "name"), &self.name, 1, 100);
        c.slug(&join(path, "slug"), &self.slug);
        c.pattern(&join(path, "color"), &self.color, &COLOR);
        c.length(&join(path, "description"), &self.description, 0, 200);
        c.tags(&join(path, "tags"), &self.tags);
    }
}

impl Check for DeviceType {
    fn check(&self, path: &str, c: &mut Checker) {
        c.length(&join(path, "model"), &self.model, 1, 100);
        c.slug(&join(path, "slug"), &self.slug);
        if let Some(manufacturer) = &self.manufacturer {
            manufacturer.check(&join(path, "manufacturer"), c);
        }
        c.length(&join(path, "description"), &self.description, 0, 200);
        c.length(&join(path, "part_number"), &self.part_number, 0, 50);
        c.tags(&join(path, "tags"), &self.tags);
    }
}

impl Check for Site {
    fn check(&self, path: &str, c: &mut Checker) {
        c.length(&join(path, "name"), &self.name, 1, 100);
        c.slug(&join(path, "slug"), &self.slug);
        c.one_of(&join(path, "status"), &self.status, SITE_STATUSES);
        c.length(&join(path, "facility"), &self.facility, 0, 50);
        c.length(&join(path, "description"), &self.description, 0, 200);
        c.tags(&join(path, "tags"), &self.tags);
    }
}

impl Check for Device {
    fn check(&self, path: &str, c: &mut Checker) {
        c.length(&join(path, "name"), &self.name, 0, 64);
        c.length(&join(path, "device_fqdn"), &self.device_fqdn, 0, 255);
        c.pattern(&join(path, "device_fqdn"), &self.device_fqdn, &DNS_NAME);

        let refs = [
            ("device_type", &self.device_type, ResourceKind::DeviceType),
            ("role", &self.role, ResourceKind::Role),
            ("platform", &self.platform, ResourceKind::Platform),
            ("site", &self.site, ResourceKind::Site),
        ];
        for (field, reference, expected) in refs {
            if let Some(reference) = reference {
                check_ref(&join(path, field), reference, expected, c);
            }
        }

        c.length(&join(path, "serial"), &self.serial, 0, 50);
        c.range(&join(path, "vc_position"), self.vc_position, 0, 255);
        c.one_of(&join(path, "status"), &self.status, DEVICE_STATUSES);
        c.length(&join(path, "description"), &self.description, 0, 200);
        c.tags(&join(path, "tags"), &self.tags);
    }
}

impl Check for Interface {
    fn check(&self, path: &str, c: &mut Checker) {
        c.length(&join(path, "name"), &self.name, 1, 64);
        if let Some(device) = &self.device {
            device.check(&join(path, "device"), c);
        }
        c.range(&join(path, "mtu"), self.mtu, 0, 65536);
        c.pattern(&join(path, "mac_address"), &self.mac_address, &MAC);
        c.range(&join(path, "speed"), self.speed, 0, i32::MAX);
        c.length(&join(path, "description"), &self.description, 0, 200);
        c.one_of(&join(path, "mode"), &self.mode, INTERFACE_MODES);
        c.tags(&join(path, "tags"), &self.tags);
    }
}

impl Check for IpAddress {
    fn check(&self, path: &str, c: &mut Checker) {
        if self.address.parse::<IpAddr>().is_err() {
            c.fail(join(path, "address"), "must be a valid IP address");
        }
        match &self.assigned_object {
            Some(AssignedObject::Interface(interface)) => {
                interface.check(&join(path, "interface"), c);
            }
            None => {}
        }
        c.required_one_of(&join(path, "status"), &self.status, IP_STATUSES);
        c.required_one_of(&join(path, "role"), &self.role, IP_ROLES);
        c.length(&join(path, "dns_name"), &self.dns_name, 0, 255);
        c.pattern(&join(path, "dns_name"), &self.dns_name, &DNS_NAME);
        c.length(&join(path, "description"), &self.description, 0, 200);
        c.tags(&join(path, "tags"), &self.tags);
    }
}

impl Check for Resource {
    fn check(&self, path: &str, c: &mut Checker) {
        match self {
            Self::Site(r) => r.check(path, c),
            Self::Platform(r) => r.check(path, c),
            Self::Manufacturer(r) => r.check(path, c),
            Self::Role(r) => r.check(path, c),
            Self::DeviceType(r) => r.check(path, c),
            Self::Interface(r) => r.check(path, c),
            Self::IpAddress(r) => r.check(path, c),
            Self::Tag(r) => r.check(path, c),
        }
    }
}

fn check_ref(path: &str, reference: &AnyRef, expected: ResourceKind, c: &mut Checker) {
    match reference.decode_as(expected) {
        Ok(resource) => resource.check(path, c),
        Err(err) => c.fail(path, err.to_string()),
    }
}

// ── Envelope ────────────────────────────────────────────────────────

impl Check for Entity {
    fn check(&self, path: &str, c: &mut Checker) {
        if self.timestamp > c.now {
            c.fail(join(path, "timestamp"), "must not be in the future");
        }
        let field = join(path, &self.kind().to_string());
        match &self.data {
            EntityData::Site(r) => r.check(&field, c),
            EntityData::Platform(r) => r.check(&field, c),
            EntityData::Manufacturer(r) => r.check(&field, c),
            EntityData::Device(r) => r.check(&field, c),
            EntityData::DeviceRole(r) => r.check(&field, c),
            EntityData::DeviceType(r) => r.check(&field, c),
            EntityData::Interface(r) => r.check(&field, c),
        }
    }
}

/// Header fields shared by the domain and wire request shapes.
struct Header<'a> {
    stream: &'a str,
    id: &'a str,
    producer_app_name: &'a str,
    producer_app_version: &'a str,
    sdk_name: &'a str,
    sdk_version: &'a str,
    entity_count: usize,
}

impl Header<'_> {
    fn check(&self, c: &mut Checker) {
        c.length("stream", self.stream, 1, 255);
        if self.entity_count == 0 || self.entity_count > MAX_ENTITIES {
            c.fail(
                "entities",
                format!("must contain between 1 and {MAX_ENTITIES} items"),
            );
        }
        c.length("id", self.id, 1, 255);
        c.length("producer_app_name", self.producer_app_name, 1, 255);
        c.length("producer_app_version", self.producer_app_version, 1, 255);
        c.length("sdk_name", self.sdk_name, 1, 255);
        if !SEMVER.is_match(self.sdk_version) {
            c.fail(
                "sdk_version",
                format!("must match pattern {}", SEMVER.as_str()),
            );
        }
    }
}

impl IngestRequest {
    /// Check every rule, reporting all violations.
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        self.validate_at(Utc::now())
    }

    /// As [`validate`](Self::validate) with an explicit notion of "now".
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), Vec<Violation>> {
        let mut c = Checker::new(now);
        Header {
            stream: &self.stream,
            id: &self.id,
            producer_app_name: &self.producer_app_name,
            producer_app_version: &self.producer_app_version,
            sdk_name: &self.sdk_name,
            sdk_version: &self.sdk_version,
            entity_count: self.entities.len(),
        }
        .check(&mut c);
        for (i, entity) in self.entities.iter().enumerate() {
            entity.check(&format!("entities[{i}]"), &mut c);
        }
        c.finish()
    }
}

/// Convert a wire request and validate it in one pass.
///
/// Entities that cannot be converted (no kind, no timestamp) are reported at
/// their index alongside ordinary rule violations.
pub fn decode_request(request: pb::IngestRequest) -> Result<IngestRequest, Vec<Violation>> {
    decode_request_at(request, Utc::now())
}

pub fn decode_request_at(
    request: pb::IngestRequest,
    now: DateTime<Utc>,
) -> Result<IngestRequest, Vec<Violation>> {
    let mut c = Checker::new(now);
    Header {
        stream: &request.stream,
        id: &request.id,
        producer_app_name: &request.producer_app_name,
        producer_app_version: &request.producer_app_version,
        sdk_name: &request.sdk_name,
        sdk_version: &request.sdk_version,
        entity_count: request.entities.len(),
    }
    .check(&mut c);

    let mut entities = Vec::with_capacity(request.entities.len());
    for (i, wire) in request.entities.into_iter().enumerate() {
        let path = format!("entities[{i}]");
        match Entity::try_from(wire) {
            Ok(entity) => {
                entity.check(&path, &mut c);
                entities.push(entity);
            }
            Err(err) => c.fail(path, err.to_string()),
        }
    }

    c.finish()?;
    Ok(IngestRequest {
        stream: request.stream,
        entities,
        id: request.id,
        producer_app_name: request.producer_app_name,
        producer_app_version: request.producer_app_version,
        sdk_name: request.sdk_name,
        sdk_version: request.sdk_version,
    })
}
