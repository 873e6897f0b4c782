//! Random record composition from reference tables into XML elements.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rand::Rng;
use tracing::{debug, info};

use super::context::{ReferenceContext, TableId};
use super::ident::unique_hash;
use crate::error::{Error, Result};
use crate::io::markup::Element;
use crate::io::reference::{ReferenceTable, Row};

const DATE: &str = "%Y-%m-%d";
const MINUTE: &str = "%Y-%m-%d %H:%M";
const SECOND: &str = "%Y-%m-%d %H:%M:%S";

/// Root element wrapping every exported record.
pub const ROOT_TAG: &str = "unload";
/// Action attribute stamped on every record.
pub const ACTION: &str = "INSERT_OR_UPDATE";

/// Record layouts the composer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Application denial (`samp_eng_app_denial`).
    Denial,
    /// Concurrent usage (`samp_eng_app_concurrent_usage`).
    ConcurrentUsage,
    /// Usage summary (`samp_eng_app_usage_summary`).
    UsageSummary,
}

impl RecordKind {
    pub const NAMES: &[&str] = &["denial", "concurrent_usage", "usage_summary"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "denial" => Some(Self::Denial),
            "concurrent_usage" => Some(Self::ConcurrentUsage),
            "usage_summary" => Some(Self::UsageSummary),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Denial => "denial",
            Self::ConcurrentUsage => "concurrent_usage",
            Self::UsageSummary => "usage_summary",
        }
    }

    /// Element tag of one record.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Denial => "samp_eng_app_denial",
            Self::ConcurrentUsage => "samp_eng_app_concurrent_usage",
            Self::UsageSummary => "samp_eng_app_usage_summary",
        }
    }

    /// Default output file name, `<tag>.xml`.
    pub fn file_name(self) -> String {
        format!("{}.xml", self.tag())
    }

    /// Reference tables the template draws from.
    pub fn tables(self) -> &'static [TableId] {
        match self {
            Self::Denial => &TableId::ALL,
            Self::ConcurrentUsage => &[TableId::Discovery],
            Self::UsageSummary => &[TableId::Users, TableId::Discovery],
        }
    }
}

/// Composes records of one kind from an injected [`ReferenceContext`].
#[derive(Debug, Clone)]
pub struct RecordComposer<'a> {
    ctx: &'a ReferenceContext,
    kind: RecordKind,
    now: NaiveDateTime,
    id_offset: usize,
    source: String,
    created_by: String,
}

impl<'a> RecordComposer<'a> {
    /// Creates a composer stamping timestamps with `now`.
    pub fn new(ctx: &'a ReferenceContext, kind: RecordKind, now: NaiveDateTime) -> Self {
        Self {
            ctx,
            kind,
            now,
            id_offset: 100,
            source: "OpeniT".to_string(),
            created_by: "admin".to_string(),
        }
    }

    /// Offset added to the 1-based record number in generated ids.
    pub fn with_id_offset(mut self, id_offset: usize) -> Self {
        self.id_offset = id_offset;
        self
    }

    /// Value of the `source` field.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Value of the `sys_created_by` and `sys_updated_by` fields.
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Composes `count` independent records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] for a zero count,
    /// [`Error::EmptyReferenceData`] if a required table has no rows and
    /// [`Error::MissingField`] if a drawn row lacks a template field.
    pub fn compose<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<Element>> {
        if count == 0 {
            return Err(Error::InvalidParams("record count must be > 0".into()));
        }
        let records = (1..=count)
            .map(|n| self.compose_one(n, rng))
            .collect::<Result<Vec<_>>>()?;
        debug!(kind = self.kind.name(), count, "records composed");
        Ok(records)
    }

    /// Composes `count` records wrapped in the `<unload>` root.
    ///
    /// # Errors
    ///
    /// See [`RecordComposer::compose`].
    pub fn compose_document<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Element> {
        let mut root = Element::new(ROOT_TAG).attr("unload_date", self.now.format(SECOND).to_string());
        for record in self.compose(count, rng)? {
            root.push(record);
        }
        info!(kind = self.kind.name(), count, "document composed");
        Ok(root)
    }

    fn compose_one<R: Rng + ?Sized>(&self, number: usize, rng: &mut R) -> Result<Element> {
        let record = Element::new(self.kind.tag()).attr("action", ACTION);
        match self.kind {
            RecordKind::Denial => self.denial(record, number, rng),
            RecordKind::ConcurrentUsage => self.concurrent_usage(record, number, rng),
            RecordKind::UsageSummary => self.usage_summary(record, rng),
        }
    }

    fn denial<R: Rng + ?Sized>(&self, record: Element, number: usize, rng: &mut R) -> Result<Element> {
        let users = self.draw(TableId::Users, rng)?;
        let discovery = self.draw(TableId::Discovery, rng)?;
        let group = self.draw(TableId::Groups, rng)?;
        let server = self.draw(TableId::LicenseServers, rng)?;
        let license_type = self.draw(TableId::LicenseTypes, rng)?;

        let record = record
            .child(Element::new("additional_key"))
            .child(users.reference("computer", "computer_name", "computer_sys_id")?)
            .child(leaf("denial_date", self.now.format(DATE)))
            .child(leaf("denial_id", format!("Denial {}", number + self.id_offset)))
            .child(discovery.reference("discovery_model", "discovery_model", "discovery_sys_id")?)
            .child(group.reference("group", "group", "group_sys_id")?)
            .child(leaf("is_product_normalized", "true"))
            .child(leaf("last_denial_time", self.now.format(MINUTE)))
            .child(server.reference("license_server", "license_server", "license_server_sys_id")?)
            .child(license_type.reference("license_type", "license_type", "license_type_sys_id")?)
            .child(discovery.reference("norm_product", "norm_product", "norm_product_sys_id")?)
            .child(discovery.reference("norm_publisher", "norm_publisher", "norm_publisher_sys_id")?)
            .child(leaf("product", discovery.field("product")?))
            .child(leaf("publisher", discovery.field("publisher")?))
            .child(leaf("source", &self.source));
        let record = self
            .audit_fields(record, rng)
            .child(leaf("total_denial_count", rng.random_range(1..=10_u32)))
            .child(users.reference("user", "user", "user_sys_id")?)
            .child(leaf("version", "2020"))
            .child(users.reference("workstation", "workstation", "workstation_sys_id")?);
        Ok(record)
    }

    fn concurrent_usage<R: Rng + ?Sized>(
        &self,
        record: Element,
        number: usize,
        rng: &mut R,
    ) -> Result<Element> {
        let discovery = self.draw(TableId::Discovery, rng)?;

        let record = record
            .child(leaf("conc_usage_id", format!("Con Usage {}", number + self.id_offset)))
            .child(leaf("concurrent_usage", rng.random_range(1..=100_u32)))
            .child(discovery.reference("license", "norm_product", "license_sys_id")?)
            .child(leaf("source", &self.source));
        Ok(self
            .audit_fields(record, rng)
            .child(leaf("usage_date", self.now.format(DATE))))
    }

    fn usage_summary<R: Rng + ?Sized>(&self, record: Element, rng: &mut R) -> Result<Element> {
        let users = self.draw(TableId::Users, rng)?;
        let discovery = self.draw(TableId::Discovery, rng)?;

        let base = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap_or_default()
            .and_time(NaiveTime::MIN);
        let idle = base + TimeDelta::seconds(rng.random_range(30..=60));
        let session = base + TimeDelta::minutes(rng.random_range(1..=15));

        let record = record
            .child(discovery.reference("norm_product", "norm_product", "norm_product_sys_id")?)
            .child(discovery.reference("norm_publisher", "norm_publisher", "norm_publisher_sys_id")?)
            .child(leaf("reporting_version", "v1"))
            .child(leaf("source", &self.source));
        Ok(self
            .audit_fields(record, rng)
            .child(leaf("total_idle_duration", idle.format(SECOND)))
            .child(leaf("total_sess_duration", session.format(SECOND)))
            .child(leaf("usage_date", self.now.format(DATE)))
            .child(users.reference("user", "user", "user_sys_id")?))
    }

    /// `sys_*` bookkeeping fields shared by every record kind.
    fn audit_fields<R: Rng + ?Sized>(&self, record: Element, rng: &mut R) -> Element {
        let stamp = self.now.format(SECOND).to_string();
        record
            .child(leaf("sys_created_by", &self.created_by))
            .child(leaf("sys_created_on", &stamp))
            .child(leaf("sys_domain", unique_hash(rng)))
            .child(leaf("sys_domain_path", "/"))
            .child(leaf("sys_id", unique_hash(rng)))
            .child(leaf("sys_mod_count", rng.random_range(1..=100_u32)))
            .child(leaf("sys_updated_by", &self.created_by))
            .child(leaf("sys_updated_on", &stamp))
    }

    fn draw<R: Rng + ?Sized>(&self, id: TableId, rng: &mut R) -> Result<Drawn<'a>> {
        let table = self.ctx.table(id);
        let row = table.choose(rng)?;
        Ok(Drawn { table, row })
    }
}

/// A row drawn from a named table.
struct Drawn<'a> {
    table: &'a ReferenceTable,
    row: &'a Row,
}

impl<'a> Drawn<'a> {
    fn field(&self, name: &str) -> Result<&'a str> {
        self.table.field(self.row, name)
    }

    /// `<tag display_value="{display}">{value}</tag>`.
    fn reference(&self, tag: &str, display: &str, value: &str) -> Result<Element> {
        Ok(Element::new(tag)
            .attr("display_value", self.field(display)?)
            .text(self.field(value)?))
    }
}

fn leaf(tag: &str, text: impl ToString) -> Element {
    Element::new(tag).text(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 5)
            .unwrap()
            .and_hms_opt(9, 30, 15)
            .unwrap()
    }

    fn discovery_only() -> ReferenceContext {
        ReferenceContext::default().with_table(
            TableId::Discovery,
            ReferenceTable::new(
                "discovery",
                vec![Row::new([
                    ("norm_product", "AutoCAD"),
                    ("license_sys_id", "lic-1"),
                ])],
            ),
        )
    }

    #[test]
    fn kind_names_round_trip() {
        for name in RecordKind::NAMES {
            let kind = RecordKind::from_name(name).unwrap();
            assert_eq!(kind.name(), *name);
            assert!(kind.file_name().starts_with("samp_eng_app_"));
        }
        assert!(RecordKind::from_name("license").is_none());
    }

    #[test]
    fn concurrent_usage_layout() {
        let ctx = discovery_only();
        let composer = RecordComposer::new(&ctx, RecordKind::ConcurrentUsage, now());
        let mut rng = StdRng::seed_from_u64(1);
        let records = composer.compose(2, &mut rng).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.tag, "samp_eng_app_concurrent_usage");
        assert_eq!(first.attribute("action"), Some("INSERT_OR_UPDATE"));
        let text = |tag: &str| first.find(tag).and_then(|c| c.text.clone());
        assert_eq!(text("conc_usage_id").as_deref(), Some("Con Usage 101"));
        assert_eq!(text("usage_date").as_deref(), Some("2024-11-05"));
        assert_eq!(text("sys_created_on").as_deref(), Some("2024-11-05 09:30:15"));
        let license = first.find("license").unwrap();
        assert_eq!(license.attribute("display_value"), Some("AutoCAD"));
        assert_eq!(license.text.as_deref(), Some("lic-1"));
        let usage: u32 = text("concurrent_usage").unwrap().parse().unwrap();
        assert!((1..=100).contains(&usage));

        let second_id = records[1].find("conc_usage_id").and_then(|c| c.text.as_deref());
        assert_eq!(second_id, Some("Con Usage 102"));
    }

    #[test]
    fn id_offset_is_configurable() {
        let ctx = discovery_only();
        let composer =
            RecordComposer::new(&ctx, RecordKind::ConcurrentUsage, now()).with_id_offset(0);
        let mut rng = StdRng::seed_from_u64(1);
        let records = composer.compose(1, &mut rng).unwrap();
        let id = records[0].find("conc_usage_id").and_then(|c| c.text.as_deref());
        assert_eq!(id, Some("Con Usage 1"));
    }

    #[test]
    fn zero_count_is_rejected() {
        let ctx = discovery_only();
        let composer = RecordComposer::new(&ctx, RecordKind::ConcurrentUsage, now());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(composer.compose(0, &mut rng), Err(Error::InvalidParams(_))));
    }

    #[test]
    fn empty_required_table_is_reported() {
        let ctx = discovery_only();
        let composer = RecordComposer::new(&ctx, RecordKind::UsageSummary, now());
        let mut rng = StdRng::seed_from_u64(1);
        match composer.compose(1, &mut rng) {
            Err(Error::EmptyReferenceData { table }) => assert_eq!(table, "users"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_field_is_reported() {
        let ctx = ReferenceContext::default().with_table(
            TableId::Discovery,
            ReferenceTable::new("discovery", vec![Row::new([("norm_product", "AutoCAD")])]),
        );
        let composer = RecordComposer::new(&ctx, RecordKind::ConcurrentUsage, now());
        let mut rng = StdRng::seed_from_u64(1);
        match composer.compose(1, &mut rng) {
            Err(Error::MissingField { table, field }) => {
                assert_eq!(table, "discovery");
                assert_eq!(field, "license_sys_id");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn document_wraps_records() {
        let ctx = discovery_only();
        let composer = RecordComposer::new(&ctx, RecordKind::ConcurrentUsage, now());
        let mut rng = StdRng::seed_from_u64(1);
        let doc = composer.compose_document(3, &mut rng).unwrap();
        assert_eq!(doc.tag, "unload");
        assert_eq!(doc.attribute("unload_date"), Some("2024-11-05 09:30:15"));
        assert_eq!(doc.children.len(), 3);
    }
}
