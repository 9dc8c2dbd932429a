//! Deterministic merging of per-operation result fragments.
//!
//! A logical resource assembled from several upstream operations is built by
//! applying one [`Fragment`] per operation, in declared order, to a
//! [`MergedRecord`]. Which fragment may write which field, and whether a
//! later write replaces an earlier one, is fixed by an [`OwnershipTable`].
//! Completion order of the underlying requests never matters.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// How a field reacts to a second write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// The first owner to supply a value keeps it.
    FirstWins,
    /// A later owner's value replaces an earlier one.
    Override,
}

/// Ownership rule for one output field.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule<F: 'static> {
    /// The output field.
    pub field: F,
    /// Sources (operation names) allowed to write the field.
    pub owners: &'static [&'static str],
    /// Behaviour on repeated writes.
    pub mode: WriteMode,
}

/// The complete set of field rules for one resource.
#[derive(Clone, Copy, Debug)]
pub struct OwnershipTable<F: 'static> {
    rules: &'static [FieldRule<F>],
}

impl<F: Copy + Eq> OwnershipTable<F> {
    /// Creates a table from a static rule list.
    #[must_use]
    pub const fn new(rules: &'static [FieldRule<F>]) -> Self {
        Self { rules }
    }

    /// Returns the rule for a field.
    #[must_use]
    pub fn rule(&self, field: F) -> Option<&FieldRule<F>> {
        self.rules.iter().find(|rule| rule.field == field)
    }
}

/// A terminal status reported by a fragment, such as a suspended account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalStatus {
    /// The upstream's reason code.
    pub reason: String,
}

/// The result of one operation, projected onto output fields.
#[derive(Clone, Debug)]
pub struct Fragment<F> {
    source: &'static str,
    fields: Vec<(F, Value)>,
    status: Option<TerminalStatus>,
    has_entity: bool,
}

impl<F> Fragment<F> {
    /// Creates an empty fragment for the named source operation.
    #[must_use]
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            fields: Vec::new(),
            status: None,
            has_entity: false,
        }
    }

    /// Records whether the source found the entity it was asked about.
    #[must_use]
    pub const fn entity(mut self, found: bool) -> Self {
        self.has_entity = found;
        self
    }

    /// Sets a field value. Null values are ignored during the merge.
    #[must_use]
    pub fn set(mut self, field: F, value: impl Into<Value>) -> Self {
        self.fields.push((field, value.into()));
        self
    }

    /// Signals a terminal status.
    #[must_use]
    pub fn status(mut self, reason: impl Into<String>) -> Self {
        self.status = Some(TerminalStatus {
            reason: reason.into(),
        });
        self
    }
}

/// Error type for merges.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// The primary source found nothing and no terminal status explains why.
    #[error("Primary source '{primary}' returned no entity")]
    NotFound {
        /// The primary source operation name.
        primary: &'static str,
    },
}

/// The merged output of all fragments.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedRecord<F: Ord> {
    fields: BTreeMap<F, Value>,
    status: Option<TerminalStatus>,
}

impl<F: Ord> MergedRecord<F> {
    /// Returns a field value.
    #[must_use]
    pub fn get(&self, field: &F) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Removes a field and deserializes it.
    ///
    /// Absent fields, and values that do not match `T`, yield `None`.
    pub fn take<T: DeserializeOwned>(&mut self, field: &F) -> Option<T> {
        self.fields
            .remove(field)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Returns the terminal status, if any fragment signalled one.
    #[must_use]
    pub const fn status(&self) -> Option<&TerminalStatus> {
        self.status.as_ref()
    }
}

/// Merges fragments in the order given.
///
/// - A null value never sets a field.
/// - A write from a source that does not own the field is logged and dropped.
/// - [`WriteMode::FirstWins`] keeps the first value; [`WriteMode::Override`]
///   lets a later owner replace it.
/// - The first terminal status is kept; other fragments still contribute
///   their fields.
///
/// # Errors
///
/// Returns [`MergeError::NotFound`] iff the fragment whose source is
/// `primary` reports no entity and no fragment signalled a terminal status.
/// A missing primary fragment counts as "no entity".
///
/// # Example
///
/// ```rust
/// use gql_gateway::aggregate::{merge, FieldRule, Fragment, OwnershipTable, WriteMode};
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
/// enum Field { Name }
///
/// static RULES: [FieldRule<Field>; 1] = [FieldRule {
///     field: Field::Name,
///     owners: &["Profile", "Card"],
///     mode: WriteMode::FirstWins,
/// }];
/// static TABLE: OwnershipTable<Field> = OwnershipTable::new(&RULES);
///
/// let fragments = vec![
///     Fragment::new("Profile").entity(true).set(Field::Name, "first"),
///     Fragment::new("Card").set(Field::Name, "second"),
/// ];
///
/// let mut record = merge(fragments, &TABLE, "Profile").unwrap();
/// assert_eq!(record.take::<String>(&Field::Name).as_deref(), Some("first"));
/// ```
pub fn merge<F>(
    fragments: Vec<Fragment<F>>,
    table: &OwnershipTable<F>,
    primary: &'static str,
) -> Result<MergedRecord<F>, MergeError>
where
    F: Copy + Eq + Ord + Debug,
{
    let mut record = MergedRecord {
        fields: BTreeMap::new(),
        status: None,
    };
    let mut primary_found = false;

    for fragment in fragments {
        if fragment.source == primary {
            primary_found = fragment.has_entity;
        }

        if let Some(status) = fragment.status {
            if record.status.is_none() {
                tracing::debug!(
                    source = fragment.source,
                    reason = %status.reason,
                    "Fragment signalled terminal status"
                );
                record.status = Some(status);
            }
        }

        for (field, value) in fragment.fields {
            if value.is_null() {
                continue;
            }

            let Some(rule) = table.rule(field) else {
                tracing::warn!(?field, source = fragment.source, "No ownership rule for field");
                continue;
            };
            if !rule.owners.contains(&fragment.source) {
                tracing::warn!(
                    ?field,
                    source = fragment.source,
                    "Dropping write from non-owner"
                );
                continue;
            }

            match rule.mode {
                WriteMode::FirstWins => {
                    record.fields.entry(field).or_insert(value);
                }
                WriteMode::Override => {
                    record.fields.insert(field, value);
                }
            }
        }
    }

    if !primary_found && record.status.is_none() {
        return Err(MergeError::NotFound { primary });
    }

    Ok(record)
}
