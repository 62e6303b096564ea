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

use crate::shared::error::{ForgeError, Result};

/// Checks `value` is usable as a resource id and returns it.
///
/// A missing or blank value fails with `No <what> is specified!`, an upper
/// case letter fails naming the letter, its index and the whole value.
pub fn validate_kubernetes_id(value: Option<&str>, what: &str) -> Result<String> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ForgeError::validation(format!("No {} is specified!", what)))?;

    if let Some((index, ch)) = value.chars().enumerate().find(|(_, c)| c.is_uppercase()) {
        return Err(ForgeError::validation(format!(
            "Invalid upper case letter '{}' at index {} for {} value: {}",
            ch, index, what, value
        )));
    }

    Ok(value.to_string())
}
