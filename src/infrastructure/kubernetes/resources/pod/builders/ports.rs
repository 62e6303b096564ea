// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Port mapping parser
//!
//! Accepts `[hostIP:][hostPort:]containerPort[/protocol]`. Tokens are read
//! right to left, the container port is always the last one. A host ip may
//! name a project property holding the address.

use crate::infrastructure::constants::PROTOCOL_TCP;
use crate::shared::error::{ForgeError, Result};
use k8s_openapi::api::core::v1::ContainerPort;
use regex::Regex;
use std::collections::BTreeMap;
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec {
    pub host_ip: Option<String>,
    pub host_port: Option<i32>,
    pub container_port: i32,
    pub protocol: String,
}

impl PortSpec {
    pub fn to_container_port(&self) -> ContainerPort {
        ContainerPort {
            container_port: self.container_port,
            host_ip: self.host_ip.clone(),
            host_port: self.host_port,
            protocol: Some(self.protocol.to_uppercase()),
            ..Default::default()
        }
    }
}

/// Parses port specs. Two-part specs may name a project property instead of
/// a host port or ip; such properties are looked up in `properties`.
pub struct PortMapping<'a> {
    properties: &'a BTreeMap<String, String>,
    protocol_re: Regex,
}

impl<'a> PortMapping<'a> {
    pub fn new(properties: &'a BTreeMap<String, String>) -> Result<Self> {
        Ok(Self {
            properties,
            protocol_re: Regex::new(r"(?i)^(.*?)(?:/(tcp|udp))?$")?,
        })
    }

    pub fn parse_all(&self, specs: &[String]) -> Result<Vec<PortSpec>> {
        specs.iter().map(|s| self.parse(s)).collect()
    }

    pub fn container_ports(&self, specs: &[String]) -> Result<Vec<ContainerPort>> {
        Ok(self
            .parse_all(specs)?
            .iter()
            .map(PortSpec::to_container_port)
            .collect())
    }

    pub fn parse(&self, spec: &str) -> Result<PortSpec> {
        let spec = spec.trim();
        let caps = self
            .protocol_re
            .captures(spec)
            .ok_or_else(|| ForgeError::port_parse(spec, "unrecognised format"))?;
        let body = caps.get(1).map_or("", |m| m.as_str());
        let protocol = caps
            .get(2)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_else(|| PROTOCOL_TCP.to_string());

        let parts: Vec<&str> = body.rsplit(':').collect();
        if parts.len() > 3 {
            return Err(ForgeError::port_parse(
                spec,
                format!("expected at most 3 ':' separated parts, found {}", parts.len()),
            ));
        }
        let container_port = parse_port(spec, parts[0])?;

        let mut port = PortSpec {
            host_ip: None,
            host_port: None,
            container_port,
            protocol,
        };

        match parts.as_slice() {
            [_, host_port, host_ip] => {
                port.host_port = Some(parse_port(spec, host_port)?);
                port.host_ip = self.resolve_host_ip(host_ip);
                if port.host_ip.is_none() {
                    tracing::debug!(
                        "Ignoring unresolved host ip '{}' for container port {}",
                        host_ip,
                        port.container_port
                    );
                }
            }
            [_, host] => self.apply_host(&mut port, host),
            _ => {}
        }

        Ok(port)
    }

    fn apply_host(&self, port: &mut PortSpec, host: &str) {
        if let Ok(number) = host.parse::<i32>() {
            port.host_port = Some(number);
        } else if let Some(ip) = self.resolve_host_ip(host) {
            port.host_ip = Some(ip);
        } else {
            match self.properties.get(host).map(|v| v.trim()) {
                Some(value) if value.parse::<i32>().is_ok() => {
                    port.host_port = value.parse().ok();
                }
                _ => tracing::debug!(
                    "Ignoring unresolved host binding '{}' for container port {}",
                    host,
                    port.container_port
                ),
            }
        }
    }

    /// Ip literal, or a property whose value is one.
    fn resolve_host_ip(&self, host: &str) -> Option<String> {
        let host = host.trim();
        if host.parse::<IpAddr>().is_ok() {
            return Some(host.to_string());
        }
        self.properties
            .get(host)
            .map(|v| v.trim())
            .filter(|v| v.parse::<IpAddr>().is_ok())
            .map(str::to_string)
    }
}

fn parse_port(spec: &str, token: &str) -> Result<i32> {
    token.trim().parse::<i32>().map_err(|_| {
        ForgeError::port_parse(spec, format!("'{}' is not a valid port number", token))
    })
}
