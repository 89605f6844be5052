//! Detailed CPU spec tables
//!
//! `{vendor}-cpu-specs.json` maps a SKU name to the rows of its spec table.
//! Rows come in two column layouts; the dataset flags server rows with
//! `_srv`, which is decoded here into [`CpuSpecVariant`].

use crate::text;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Spec table rows keyed by SKU name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecTable(HashMap<String, Vec<CpuSpecRow>>);

impl SpecTable {
    /// Empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows for a SKU
    pub fn insert(&mut self, sku_name: impl Into<String>, rows: Vec<CpuSpecRow>) {
        self.0.insert(sku_name.into(), rows);
    }

    /// Rows for a SKU, if it has a non-empty table
    #[must_use]
    pub fn rows(&self, sku_name: &str) -> Option<&[CpuSpecRow]> {
        self.0
            .get(sku_name)
            .map(Vec::as_slice)
            .filter(|rows| !rows.is_empty())
    }

    /// Model names for a SKU (empty if none)
    pub fn model_names<'a>(&'a self, sku_name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.rows(sku_name)
            .unwrap_or(&[])
            .iter()
            .map(|row| row.name.as_str())
    }

    /// Number of SKUs with tables
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no SKU has a table
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<CpuSpecRow>)> for SpecTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<CpuSpecRow>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One model row of a detailed CPU spec table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawCpuSpecRow", into = "RawCpuSpecRow")]
pub struct CpuSpecRow {
    /// Model name
    pub name: String,
    /// Core count
    pub cores: String,
    /// Thread count
    pub threads: String,
    /// Boost clock
    pub boost: String,
    /// Base clock
    pub base: String,
    /// L3 cache
    pub l3: String,
    /// TDP
    pub tdp: String,
    /// Socket
    pub socket: String,
    /// Product id (tray)
    pub tray: String,
    /// Layout-specific columns
    pub variant: CpuSpecVariant,
}

impl CpuSpecRow {
    /// Create a client row with only a name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True for server-layout rows
    #[inline]
    #[must_use]
    pub fn is_server(&self) -> bool {
        matches!(self.variant, CpuSpecVariant::Server { .. })
    }
}

/// Layout-specific columns of a CPU spec row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuSpecVariant {
    /// Server parts: socket count, PCIe lanes, memory support
    Server {
        /// Supported socket count
        sockets: String,
        /// PCIe lanes/generation
        pcie: String,
        /// Memory support
        memory: String,
    },
    /// Client parts: integrated graphics
    Client {
        /// Integrated GPU model
        gpu_model: String,
        /// Integrated GPU compute units
        gpu_cus: String,
        /// Integrated GPU frequency
        gpu_freq: String,
    },
}

impl Default for CpuSpecVariant {
    fn default() -> Self {
        Self::Client {
            gpu_model: String::new(),
            gpu_cus: String::new(),
            gpu_freq: String::new(),
        }
    }
}

/// Column layout of a whole spec table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecTableLayout {
    /// Sockets / PCIe / Memory columns
    Server,
    /// GPU model / CUs / frequency columns
    Client,
}

impl SpecTableLayout {
    /// Layout of a table, decided by its first row
    #[must_use]
    pub fn of(rows: &[CpuSpecRow]) -> Self {
        match rows.first() {
            Some(row) if row.is_server() => Self::Server,
            _ => Self::Client,
        }
    }

    /// Column headers for this layout
    #[must_use]
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Server => &[
                "Name", "Cores", "Threads", "Boost", "Base", "L3", "TDP", "Socket", "Sockets",
                "PCIe", "Memory", "Product ID Tray",
            ],
            Self::Client => &[
                "Name", "Cores", "Threads", "Boost", "Base", "L3", "TDP", "Socket", "GPU Model",
                "GPU CUs", "GPU Freq", "Product ID Tray",
            ],
        }
    }
}

/// Wire shape of a spec row, with short column keys and the `_srv` flag
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawCpuSpecRow {
    #[serde(deserialize_with = "text::lenient")]
    n: String,
    #[serde(deserialize_with = "text::lenient")]
    c: String,
    #[serde(deserialize_with = "text::lenient")]
    t: String,
    #[serde(deserialize_with = "text::lenient")]
    bst: String,
    #[serde(deserialize_with = "text::lenient")]
    bas: String,
    #[serde(deserialize_with = "text::lenient")]
    l3: String,
    #[serde(deserialize_with = "text::lenient")]
    tdp: String,
    #[serde(deserialize_with = "text::lenient")]
    sk: String,
    #[serde(deserialize_with = "text::lenient")]
    tr: String,
    #[serde(rename = "_srv", deserialize_with = "text::lenient_bool")]
    srv: bool,
    #[serde(deserialize_with = "text::lenient", skip_serializing_if = "String::is_empty")]
    skc: String,
    #[serde(deserialize_with = "text::lenient", skip_serializing_if = "String::is_empty")]
    pcie: String,
    #[serde(deserialize_with = "text::lenient", skip_serializing_if = "String::is_empty")]
    mem: String,
    #[serde(deserialize_with = "text::lenient", skip_serializing_if = "String::is_empty")]
    gm: String,
    #[serde(deserialize_with = "text::lenient", skip_serializing_if = "String::is_empty")]
    gc: String,
    #[serde(deserialize_with = "text::lenient", skip_serializing_if = "String::is_empty")]
    gf: String,
}

impl From<RawCpuSpecRow> for CpuSpecRow {
    fn from(raw: RawCpuSpecRow) -> Self {
        let variant = if raw.srv {
            CpuSpecVariant::Server {
                sockets: raw.skc,
                pcie: raw.pcie,
                memory: raw.mem,
            }
        } else {
            CpuSpecVariant::Client {
                gpu_model: raw.gm,
                gpu_cus: raw.gc,
                gpu_freq: raw.gf,
            }
        };
        Self {
            name: raw.n,
            cores: raw.c,
            threads: raw.t,
            boost: raw.bst,
            base: raw.bas,
            l3: raw.l3,
            tdp: raw.tdp,
            socket: raw.sk,
            tray: raw.tr,
            variant,
        }
    }
}

impl From<CpuSpecRow> for RawCpuSpecRow {
    fn from(row: CpuSpecRow) -> Self {
        let mut raw = RawCpuSpecRow {
            n: row.name,
            c: row.cores,
            t: row.threads,
            bst: row.boost,
            bas: row.base,
            l3: row.l3,
            tdp: row.tdp,
            sk: row.socket,
            tr: row.tray,
            ..RawCpuSpecRow::default()
        };
        match row.variant {
            CpuSpecVariant::Server { sockets, pcie, memory } => {
                raw.srv = true;
                raw.skc = sockets;
                raw.pcie = pcie;
                raw.mem = memory;
            }
            CpuSpecVariant::Client { gpu_model, gpu_cus, gpu_freq } => {
                raw.gm = gpu_model;
                raw.gc = gpu_cus;
                raw.gf = gpu_freq;
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SPECS: &str = r#"{
        "Epyc 9004": [
            {"n": "EPYC 9654", "c": 96, "t": 192, "bst": "3.7 GHz", "bas": "2.4 GHz",
             "l3": "384 MB", "tdp": "360 W", "sk": "SP5", "_srv": true,
             "skc": "1P/2P", "pcie": "128x Gen5", "mem": "12ch DDR5", "tr": "100-000000789"}
        ],
        "Ryzen 7000": [
            {"n": "Ryzen 9 7950X", "c": 16, "t": 32, "bst": "5.7 GHz", "bas": "4.5 GHz",
             "l3": "64 MB", "tdp": "170 W", "sk": "AM5", "gm": "Radeon", "gc": 2, "gf": "2.2 GHz",
             "tr": "100-000000514"}
        ],
        "Empty": []
    }"#;

    #[test]
    fn server_flag_decodes_to_variant() {
        let table: SpecTable = serde_json::from_str(SPECS).unwrap();
        let rows = table.rows("Epyc 9004").unwrap();
        assert_eq!(
            rows[0].variant,
            CpuSpecVariant::Server {
                sockets: "1P/2P".to_string(),
                pcie: "128x Gen5".to_string(),
                memory: "12ch DDR5".to_string(),
            }
        );
        assert_eq!(rows[0].cores, "96");
        assert_eq!(SpecTableLayout::of(rows), SpecTableLayout::Server);
    }

    #[test]
    fn numeric_server_flag_keeps_the_table() {
        let json = r#"{
            "Epyc": [{"n": "EPYC 7601", "_srv": 1, "skc": "1P/2P"}],
            "Ryzen": [{"n": "Ryzen 7 1700", "_srv": 0}]
        }"#;
        let table: SpecTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.rows("Epyc").unwrap()[0].is_server());
        assert!(!table.rows("Ryzen").unwrap()[0].is_server());
    }

    #[test]
    fn client_rows_carry_gpu_columns() {
        let table: SpecTable = serde_json::from_str(SPECS).unwrap();
        let rows = table.rows("Ryzen 7000").unwrap();
        assert!(!rows[0].is_server());
        assert_eq!(SpecTableLayout::of(rows), SpecTableLayout::Client);
        assert_eq!(SpecTableLayout::of(rows).columns()[8], "GPU Model");
    }

    #[test]
    fn empty_tables_are_absent() {
        let table: SpecTable = serde_json::from_str(SPECS).unwrap();
        assert!(table.rows("Empty").is_none());
        assert!(table.rows("Unknown").is_none());
        assert_eq!(table.model_names("Empty").count(), 0);
        assert_eq!(
            table.model_names("Ryzen 7000").collect::<Vec<_>>(),
            vec!["Ryzen 9 7950X"]
        );
    }

    #[test]
    fn server_row_serializes_with_flag() {
        let table: SpecTable = serde_json::from_str(SPECS).unwrap();
        let row = table.rows("Epyc 9004").unwrap()[0].clone();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["_srv"], serde_json::Value::Bool(true));
        assert_eq!(json["n"], "EPYC 9654");
    }
}
