//! Rendering filled packages as natural-language package calls.
//!
//! The drafting agent receives these lines verbatim, so the format is fixed:
//!
//! ```text
//! Paquete "Pagos" con las siguientes inputs:
//! input1 = 10.
//! ```

use serde::{Deserialize, Serialize};

use crate::agent::PackageInputsTurn;
use crate::packages::{PackageInfo, PackageIo};

/// A named input value supplied by the owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub value: String,
}

impl Slot {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A package with its inputs filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledPackage {
    pub usage: String,
    pub package_name: String,
    pub updated_slots: Vec<Slot>,
    pub outputs: Vec<PackageIo>,
}

impl FilledPackage {
    /// Combine the package description with the confirmed filler turn
    pub fn from_turn(info: &PackageInfo, turn: PackageInputsTurn) -> Self {
        let package_name = if turn.package_name.trim().is_empty() {
            info.name.clone()
        } else {
            turn.package_name
        };

        Self {
            usage: info.usage.clone(),
            package_name,
            updated_slots: turn.updated_slots,
            outputs: info.outputs.clone(),
        }
    }
}

/// `name = value` lines
pub fn render_slots(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(|slot| format!("{} = {}", slot.name, slot.value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One package call line
pub fn render_package_call(package: &FilledPackage) -> String {
    format!(
        "Paquete \"{}\" con las siguientes inputs:\n{}.",
        package.package_name,
        render_slots(&package.updated_slots)
    )
}

/// A package used without inputs
pub fn render_bare_package(name: &str) -> String {
    format!("Paquete \"{name}\" sin inputs.")
}

/// All package calls in workflow order: the bare package first (if any),
/// then the filled packages as given. Unnamed packages are skipped.
pub fn assemble(bare: Option<&str>, filled: &[FilledPackage]) -> String {
    bare.filter(|name| !name.is_empty())
        .map(render_bare_package)
        .into_iter()
        .chain(
            filled
                .iter()
                .filter(|p| !p.package_name.is_empty())
                .map(render_package_call),
        )
        .collect::<Vec<_>>()
        .join("\n\n")
}
