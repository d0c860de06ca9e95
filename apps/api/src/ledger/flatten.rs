//! Denormalises one submission into ledger rows, one per business.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::census::{BusinessRecord, IndustryCategory, LocationRecord, SummaryCounts};

/// Column names, in storage order.
pub const LEDGER_HEADERS: [&str; 26] = [
    "Provinsi",
    "Kabupaten/Kota",
    "Kecamatan",
    "Desa/Kelurahan",
    "RT/RW",
    "Nama Pendata",
    "Nama Pemeriksa",
    "Tanggal",
    "Timestamp",
    "Jumlah Industri Makanan",
    "Jumlah Industri Alat Rumah Tangga",
    "Jumlah Industri Material Bahan Bangunan",
    "Jumlah Industri Alat Pertanian",
    "Jumlah Industri Kerajinan selain logam",
    "Jumlah Industri Logam",
    "Jumlah Industri Lainnya",
    "Nama Usaha",
    "Nama Pemilik",
    "Jumlah Tenaga Kerja",
    "Ind.Makanan(3.1)",
    "Ind.Alat RT(3.2)",
    "Ind.Material(3.3)",
    "Ind.Alat Pertanian(3.4)",
    "Ind.Kerajinan(3.5)",
    "Ind.Logam(3.6)",
    "Ind.Lainnya(3.7)",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One denormalised ledger row: location + summary repeated on every row, then the
/// business fields and its seven 0/1 category flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub province: String,
    pub regency: String,
    pub district: String,
    pub village: String,
    pub rt_rw: String,
    pub enumerator_name: String,
    pub checker_name: String,
    pub date: String,
    pub timestamp: String,
    pub summary_counts: [u32; 7],
    pub business_name: String,
    pub owner_name: String,
    pub worker_count: u32,
    pub category_flags: [u8; 7],
}

impl LedgerRow {
    /// Cell values in [`LEDGER_HEADERS`] order.
    pub fn values(&self) -> Vec<Value> {
        let mut values: Vec<Value> = vec![
            self.province.clone().into(),
            self.regency.clone().into(),
            self.district.clone().into(),
            self.village.clone().into(),
            self.rt_rw.clone().into(),
            self.enumerator_name.clone().into(),
            self.checker_name.clone().into(),
            self.date.clone().into(),
            self.timestamp.clone().into(),
        ];
        values.extend(self.summary_counts.iter().map(|&c| Value::from(c)));
        values.push(self.business_name.clone().into());
        values.push(self.owner_name.clone().into());
        values.push(self.worker_count.into());
        values.extend(self.category_flags.iter().map(|&f| Value::from(f)));
        values
    }
}

/// One row per business, in input order. Every row carries the same `recorded_at`.
pub fn flatten_submission(
    location: &LocationRecord,
    summary: &SummaryCounts,
    businesses: &[BusinessRecord],
    recorded_at: NaiveDateTime,
) -> Vec<LedgerRow> {
    let timestamp = recorded_at.format(TIMESTAMP_FORMAT).to_string();
    let summary_counts = IndustryCategory::ALL.map(|category| summary.get(category));

    businesses
        .iter()
        .map(|business| LedgerRow {
            province: location.province.clone(),
            regency: location.regency.clone(),
            district: location.district.clone(),
            village: location.village.clone(),
            rt_rw: location.rt_rw(),
            enumerator_name: location.enumerator_name.clone(),
            checker_name: location.checker_name.clone(),
            date: location.date_str(),
            timestamp: timestamp.clone(),
            summary_counts,
            business_name: business.business_name.clone(),
            owner_name: business.owner_name.clone(),
            worker_count: business.worker_count,
            category_flags: IndustryCategory::ALL
                .map(|category| u8::from(business.has_category(category))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_location() -> LocationRecord {
        LocationRecord {
            province: "JAWA TENGAH".to_string(),
            regency: "TEGAL".to_string(),
            district: "TEGAL TIMUR".to_string(),
            village: "KEJAMBON".to_string(),
            rt: "03".to_string(),
            rw: "05".to_string(),
            enumerator_name: "Sari".to_string(),
            checker_name: "Budi".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
        }
    }

    fn make_business(name: &str, codes: &[IndustryCategory], workers: u32) -> BusinessRecord {
        BusinessRecord {
            business_name: name.to_string(),
            owner_name: format!("Pemilik {name}"),
            category_codes: codes.iter().copied().collect(),
            worker_count: workers,
        }
    }

    fn recorded_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 14)
            .unwrap()
            .and_hms_opt(9, 5, 30)
            .unwrap()
    }

    #[test]
    fn test_one_row_per_business_in_order() {
        let businesses = vec![
            make_business("Tahu", &[IndustryCategory::Food], 3),
            make_business("Pandai Besi", &[IndustryCategory::Metal, IndustryCategory::FarmTools], 2),
        ];
        let rows = flatten_submission(
            &make_location(),
            &SummaryCounts::new([1, 0, 0, 1, 0, 0, 0]),
            &businesses,
            recorded_at(),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].business_name, "Tahu");
        assert_eq!(rows[1].owner_name, "Pemilik Pandai Besi");
        assert_eq!(rows[1].category_flags, [0, 0, 0, 1, 0, 1, 0]);
        assert!(rows.iter().all(|r| r.summary_counts == [1, 0, 0, 1, 0, 0, 0]));
    }

    #[test]
    fn test_no_businesses_gives_no_rows() {
        let rows = flatten_submission(
            &make_location(),
            &SummaryCounts::default(),
            &[],
            recorded_at(),
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn test_values_follow_header_order() {
        let rows = flatten_submission(
            &make_location(),
            &SummaryCounts::new([1, 0, 0, 0, 0, 0, 0]),
            &[make_business("Tahu", &[IndustryCategory::Food], 3)],
            recorded_at(),
        );
        let values = rows[0].values();
        assert_eq!(values.len(), LEDGER_HEADERS.len());

        let column = |name: &str| {
            let i = LEDGER_HEADERS.iter().position(|h| *h == name).unwrap();
            values[i].clone()
        };
        assert_eq!(column("RT/RW"), "RT 03 RW 05");
        assert_eq!(column("Tanggal"), "2025-06-14");
        assert_eq!(column("Timestamp"), "2025-06-14 09:05:30");
        assert_eq!(column("Jumlah Industri Makanan"), 1);
        assert_eq!(column("Jumlah Tenaga Kerja"), 3);
        assert_eq!(column("Ind.Makanan(3.1)"), 1);
        assert_eq!(column("Ind.Lainnya(3.7)"), 0);
    }
}
