//! Per-kind field declarations.
//!
//! Every node kind owns a static [`KindDescriptor`] naming its type tag, its
//! parent kind, and the fields it adds to the persisted form. Descriptors link
//! to their parent, so a kind inherits everything its ancestors declared
//! without repeating it.
//!
//! ```text
//! Node            IsFavorite, IsHidden, Profile
//! └── Script      Script, WorkingDirectory
//!     └── BashScript  Shell
//! ```

/// Static metadata describing one node kind.
#[derive(Debug)]
pub struct KindDescriptor {
    /// The registry tag written to `_type`.
    pub tag: &'static str,
    /// The kind this one extends, if any.
    pub parent: Option<&'static KindDescriptor>,
    /// Fields this kind adds to the persisted form.
    pub fields: &'static [&'static str],
    /// Fields that exist at runtime but must never be persisted.
    ///
    /// A transient declaration anywhere in the chain removes the field from
    /// the serializable list, even if an ancestor declared it persistable.
    pub transient: &'static [&'static str],
}

/// Fields shared by every kind.
pub const FIELD_IS_FAVORITE: &str = "IsFavorite";
pub const FIELD_IS_HIDDEN: &str = "IsHidden";
pub const FIELD_PROFILE: &str = "Profile";

/// Root of every descriptor chain.
pub static NODE: KindDescriptor = KindDescriptor {
    tag: "Node",
    parent: None,
    fields: &[FIELD_IS_FAVORITE, FIELD_IS_HIDDEN, FIELD_PROFILE],
    transient: &[],
};

impl KindDescriptor {
    /// Iterates the chain starting at this descriptor, most-derived first.
    pub fn chain(&'static self) -> impl Iterator<Item = &'static KindDescriptor> {
        std::iter::successors(Some(self), |d| d.parent)
    }

    /// Returns true if `self` is `other` or extends it.
    pub fn is_a(&'static self, other: &KindDescriptor) -> bool {
        self.chain().any(|d| d.tag == other.tag)
    }
}

/// Returns the tags of the descriptor chain, most-derived first.
pub fn ancestry(descriptor: &'static KindDescriptor) -> Vec<&'static str> {
    descriptor.chain().map(|d| d.tag).collect()
}

/// Returns the ordered, de-duplicated list of persisted fields for a kind.
///
/// The chain is walked most-derived first: a kind's own declarations come
/// first, followed by each ancestor's fields not already listed. Fields
/// declared transient anywhere in the chain are left out.
pub fn serializable_fields(descriptor: &'static KindDescriptor) -> Vec<&'static str> {
    let transient: Vec<&'static str> = descriptor
        .chain()
        .flat_map(|d| d.transient.iter().copied())
        .collect();

    let mut fields: Vec<&'static str> = Vec::new();
    for d in descriptor.chain() {
        for field in d.fields {
            if !fields.contains(field) && !transient.contains(field) {
                fields.push(field);
            }
        }
    }
    fields
}

/// Returns every field declared transient along the chain.
pub fn transient_fields(descriptor: &'static KindDescriptor) -> Vec<&'static str> {
    let mut fields: Vec<&'static str> = Vec::new();
    for d in descriptor.chain() {
        for field in d.transient {
            if !fields.contains(field) {
                fields.push(field);
            }
        }
    }
    fields
}
