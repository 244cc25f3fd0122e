//! One loaded set of collections for a running app instance.
//!
//! # Responsibility
//! - Construct every store once, over one backend and one clock.
//! - Offer report entry points re-derived from current state.

use super::{CallService, ContactService};
use crate::clock::SharedClock;
use crate::i18n::Translator;
use crate::model::service_record::ServiceRecord;
use crate::report::{
    parse_for_annual_report, parse_for_month_report, AnnualReportData, MonthReportData,
    ReportContext, ReportInput, ReportPolicy,
};
use crate::storage::BlobStore;
use crate::store::{DeletedOrder, EntityStore};
use chrono::Datelike;

/// Behavior switches for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    pub report_policy: ReportPolicy,
    pub deleted_order: DeletedOrder,
}

pub struct FieldLog<B: BlobStore + Clone> {
    calls: CallService<B>,
    records: EntityStore<ServiceRecord, B>,
    contacts: ContactService<B>,
    clock: SharedClock,
    options: SessionOptions,
}

impl<B: BlobStore + Clone> FieldLog<B> {
    /// Reads every collection from `backend`.
    pub fn load(backend: B, clock: SharedClock, options: SessionOptions) -> Self {
        Self {
            calls: CallService::load(backend.clone(), clock.clone()),
            records: EntityStore::load(backend.clone(), clock.clone()),
            contacts: ContactService::load(backend, clock.clone(), options.deleted_order),
            clock,
            options,
        }
    }

    pub fn calls(&self) -> &CallService<B> {
        &self.calls
    }

    pub fn calls_mut(&mut self) -> &mut CallService<B> {
        &mut self.calls
    }

    pub fn records(&self) -> &EntityStore<ServiceRecord, B> {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut EntityStore<ServiceRecord, B> {
        &mut self.records
    }

    pub fn contacts(&self) -> &ContactService<B> {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut ContactService<B> {
        &mut self.contacts
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Month report for zero-based `month`; `None`/`Some(0)` year = current.
    pub fn month_report(
        &self,
        month: u32,
        year: Option<i32>,
        translator: &dyn Translator,
    ) -> MonthReportData {
        parse_for_month_report(&self.report_input(), month, year, &self.context(translator))
    }

    /// Report for the clock's current month.
    pub fn current_month_report(&self, translator: &dyn Translator) -> MonthReportData {
        let now = self.clock.now();
        self.month_report(now.month0(), Some(now.year()), translator)
    }

    pub fn annual_report(&self, year: Option<i32>, translator: &dyn Translator) -> AnnualReportData {
        parse_for_annual_report(&self.report_input(), year, &self.context(translator))
    }

    /// Debug affordance: empties every collection.
    pub fn remove_everything(&mut self) {
        self.calls.delete_all_calls();
        self.records.remove_all();
        self.contacts.remove_all();
    }

    fn report_input(&self) -> ReportInput<'_> {
        ReportInput {
            calls: self.calls.calls(),
            visits: self.calls.visits(),
            records: self.records.list(),
        }
    }

    fn context<'a>(&'a self, translator: &'a dyn Translator) -> ReportContext<'a> {
        ReportContext {
            clock: self.clock.as_ref(),
            translator,
            policy: self.options.report_policy,
        }
    }
}
