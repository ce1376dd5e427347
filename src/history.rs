//! Day-by-day view of stored history.
//!
//! Storage order is most-recent-first by insertion, which is not always
//! chronological. The history screen lists records grouped by calendar day,
//! newest day first; inside a day the storage order is kept.

use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::dto::{PaymentCollection, Transaction};

pub struct DayGroup<'a, T> {
    pub day: NaiveDate,
    pub records: Vec<&'a T>,
}

pub fn group_by_day<'a, T, F>(records: &'a [T], day_of: F) -> Vec<DayGroup<'a, T>>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut days: BTreeMap<Reverse<NaiveDate>, Vec<&'a T>> = BTreeMap::new();
    for record in records {
        days.entry(Reverse(day_of(record))).or_default().push(record);
    }
    days.into_iter()
        .map(|(Reverse(day), records)| DayGroup { day, records })
        .collect()
}

pub fn transactions_by_day(transactions: &[Transaction]) -> Vec<DayGroup<'_, Transaction>> {
    group_by_day(transactions, Transaction::day)
}

pub fn collections_by_day(
    collections: &[PaymentCollection],
) -> Vec<DayGroup<'_, PaymentCollection>> {
    group_by_day(collections, PaymentCollection::day)
}
