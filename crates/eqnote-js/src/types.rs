//! Types exposed to JavaScript via wasm-bindgen.

use eqnote_core::{BlockAnalysis, PageReport};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Result of an enhancement pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsPageReport {
    /// False when the page had already been enhanced.
    pub ran: bool,
    pub links_stripped: usize,
    pub lists: usize,
    pub bound: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl From<Option<PageReport>> for JsPageReport {
    fn from(report: Option<PageReport>) -> Self {
        match report {
            Some(report) => Self {
                ran: true,
                links_stripped: report.links_stripped,
                lists: report.lists,
                bound: report.annotations.bound,
                failed: report.annotations.failed,
                skipped: report.annotations.skipped,
            },
            None => Self::default(),
        }
    }
}

/// Summary of one rendered math block.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsBlockAnalysis {
    pub num_lines: usize,
    pub num_eqn_tags: usize,
    pub num_eqn: usize,
    pub ids: Vec<String>,
    pub eqn_to_line_map: Vec<Vec<usize>>,
    pub anomalous: bool,
}

impl From<BlockAnalysis> for JsBlockAnalysis {
    fn from(analysis: BlockAnalysis) -> Self {
        Self {
            num_lines: analysis.num_lines,
            num_eqn_tags: analysis.num_eqn_tags,
            num_eqn: analysis.num_eqn,
            ids: analysis.ids.iter().map(ToString::to_string).collect(),
            eqn_to_line_map: analysis.eqn_to_line_map,
            anomalous: analysis.anomalous,
        }
    }
}

/// Analysis of every math block on the page.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsAnalysisReport {
    pub blocks: Vec<JsBlockAnalysis>,
}
