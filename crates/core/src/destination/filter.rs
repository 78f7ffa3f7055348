//! Compatibility partition of destinations against a scheme's declared
//! platforms.

use super::{Destination, Platform};

/// Destinations split by scheme compatibility. Unsupported entries are
/// retained, not dropped: the user may still deliberately pick one.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub supported: Vec<Destination>,
    pub unsupported: Vec<Destination>,
}

impl Partition {
    pub fn is_empty(&self) -> bool {
        self.supported.is_empty() && self.unsupported.is_empty()
    }

    pub fn len(&self) -> usize {
        self.supported.len() + self.unsupported.len()
    }

    /// Look a destination up by id or display name, searching the
    /// supported half first.
    pub fn find(&self, wanted: &str) -> Option<&Destination> {
        self.iter()
            .find(|d| d.id() == wanted || d.name() == Some(wanted))
    }

    /// All destinations in presentation order: supported, then unsupported.
    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.supported.iter().chain(self.unsupported.iter())
    }
}

/// Split `destinations` by whether their platform tag appears in
/// `declared`. An absent or empty declared set treats everything as
/// supported: a scheme that does not report SUPPORTED_PLATFORMS must not
/// block every run. Enumeration order is preserved within each half.
pub fn partition(destinations: Vec<Destination>, declared: Option<&[Platform]>) -> Partition {
    let declared = match declared {
        Some(platforms) if !platforms.is_empty() => platforms,
        _ => {
            return Partition {
                supported: destinations,
                unsupported: Vec::new(),
            };
        }
    };

    let mut split = Partition::default();
    for destination in destinations {
        if declared.contains(&destination.platform()) {
            split.supported.push(destination);
        } else {
            split.unsupported.push(destination);
        }
    }
    split
}
