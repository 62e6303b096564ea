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

use crate::domain::config::resource::ProbeConfig;
use crate::shared::error::{ForgeError, Result};
use k8s_openapi::api::core::v1::{ExecAction, HTTPGetAction, Probe, TCPSocketAction};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use url::{Host, Url};

pub struct ProbeBuilder;

impl ProbeBuilder {
    /// Probe for `config`, preferring HTTP GET over exec over TCP.
    /// Returns `None` when no action is configured.
    pub fn build(config: Option<&ProbeConfig>) -> Result<Option<Probe>> {
        let Some(config) = config else {
            return Ok(None);
        };

        let mut probe = if let Some(url) = non_blank(&config.get_url) {
            Probe {
                http_get: Some(Self::http_get_action(url)?),
                ..Default::default()
            }
        } else if let Some(command) = non_blank(&config.exec) {
            Probe {
                exec: Some(ExecAction {
                    command: Some(split_command_line(command)?),
                }),
                ..Default::default()
            }
        } else if let Some(port) = non_blank(&config.tcp_port) {
            Probe {
                tcp_socket: Some(TCPSocketAction {
                    port: int_or_string(port),
                    ..Default::default()
                }),
                ..Default::default()
            }
        } else {
            return Ok(None);
        };

        probe.initial_delay_seconds = config.initial_delay_seconds.filter(|s| *s > 0);
        probe.timeout_seconds = config.timeout_seconds.filter(|s| *s > 0);
        probe.period_seconds = config.period_seconds.filter(|s| *s > 0);
        Ok(Some(probe))
    }

    fn http_get_action(url: &str) -> Result<HTTPGetAction> {
        let invalid = || {
            ForgeError::config_error(format!(
                "Invalid URL {} given for HTTP GET readiness check",
                url
            ))
        };
        let parsed = Url::parse(url).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid());
        }

        let host = match parsed.host().ok_or_else(invalid)? {
            Host::Domain(domain) => domain.to_string(),
            Host::Ipv4(addr) => addr.to_string(),
            Host::Ipv6(addr) => addr.to_string(),
        };
        let port = parsed.port_or_known_default().ok_or_else(invalid)?;

        Ok(HTTPGetAction {
            host: Some(host),
            path: Some(parsed.path().to_string()),
            port: IntOrString::Int(i32::from(port)),
            scheme: Some(parsed.scheme().to_uppercase()),
            ..Default::default()
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn int_or_string(port: &str) -> IntOrString {
    port.parse::<i32>()
        .map(IntOrString::Int)
        .unwrap_or_else(|_| IntOrString::String(port.to_string()))
}

/// Splits a command line into arguments. Single and double quotes group
/// words, an unterminated quote is an error.
pub fn split_command_line(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_arg = true;
            }
            None if ch.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(ch);
                in_arg = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ForgeError::CommandLineParse(line.to_string()));
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}
