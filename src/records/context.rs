//! Reference tables loaded once by the caller and shared with the composer.

use std::path::Path;

use crate::config::ReferenceFiles;
use crate::io::reference::{ReferenceTable, load_reference_table};

/// Identifies one of the reference tables a record template draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableId {
    Users,
    Discovery,
    Groups,
    LicenseServers,
    LicenseTypes,
}

impl TableId {
    pub const ALL: [TableId; 5] = [
        TableId::Users,
        TableId::Discovery,
        TableId::Groups,
        TableId::LicenseServers,
        TableId::LicenseTypes,
    ];

    /// Name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            TableId::Users => "users",
            TableId::Discovery => "discovery",
            TableId::Groups => "groups",
            TableId::LicenseServers => "license_servers",
            TableId::LicenseTypes => "license_types",
        }
    }
}

/// The reference tables available to record composition.
///
/// Tables a record kind does not need may be left empty.
#[derive(Debug, Clone)]
pub struct ReferenceContext {
    pub users: ReferenceTable,
    pub discovery: ReferenceTable,
    pub groups: ReferenceTable,
    pub license_servers: ReferenceTable,
    pub license_types: ReferenceTable,
}

impl Default for ReferenceContext {
    fn default() -> Self {
        Self {
            users: ReferenceTable::empty(TableId::Users.name()),
            discovery: ReferenceTable::empty(TableId::Discovery.name()),
            groups: ReferenceTable::empty(TableId::Groups.name()),
            license_servers: ReferenceTable::empty(TableId::LicenseServers.name()),
            license_types: ReferenceTable::empty(TableId::LicenseTypes.name()),
        }
    }
}

impl ReferenceContext {
    /// Loads the listed tables from `dir` using the configured file names.
    ///
    /// Each missing or empty file is reported once and leaves that table empty.
    pub fn load(dir: &Path, files: &ReferenceFiles, tables: &[TableId]) -> Self {
        let mut ctx = Self::default();
        for &id in tables {
            let path = dir.join(files.file_name(id));
            *ctx.table_mut(id) = load_reference_table(id.name(), &path);
        }
        ctx
    }

    /// Replaces one table, for callers assembling a context in memory.
    pub fn with_table(mut self, id: TableId, table: ReferenceTable) -> Self {
        *self.table_mut(id) = table;
        self
    }

    pub fn table(&self, id: TableId) -> &ReferenceTable {
        match id {
            TableId::Users => &self.users,
            TableId::Discovery => &self.discovery,
            TableId::Groups => &self.groups,
            TableId::LicenseServers => &self.license_servers,
            TableId::LicenseTypes => &self.license_types,
        }
    }

    fn table_mut(&mut self, id: TableId) -> &mut ReferenceTable {
        match id {
            TableId::Users => &mut self.users,
            TableId::Discovery => &mut self.discovery,
            TableId::Groups => &mut self.groups,
            TableId::LicenseServers => &mut self.license_servers,
            TableId::LicenseTypes => &mut self.license_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::reference::Row;

    #[test]
    fn default_tables_are_empty_and_named() {
        let ctx = ReferenceContext::default();
        for id in TableId::ALL {
            assert!(ctx.table(id).is_empty());
            assert_eq!(ctx.table(id).name(), id.name());
        }
    }

    #[test]
    fn with_table_replaces_only_that_table() {
        let groups = ReferenceTable::new("groups", vec![Row::new([("group", "CAD")])]);
        let ctx = ReferenceContext::default().with_table(TableId::Groups, groups);
        assert_eq!(ctx.groups.len(), 1);
        let empty: Vec<&str> = TableId::ALL
            .into_iter()
            .filter(|&id| ctx.table(id).is_empty())
            .map(TableId::name)
            .collect();
        assert_eq!(empty, vec!["users", "discovery", "license_servers", "license_types"]);
    }

    #[test]
    fn load_from_missing_dir_leaves_tables_empty() {
        let ctx = ReferenceContext::load(
            Path::new("no/such/dir"),
            &ReferenceFiles::default(),
            &[TableId::Users],
        );
        assert!(ctx.users.is_empty());
    }
}
