//! Output layer for campaign insights.
//!
//! Renders the console data profile, the self-contained HTML report and the
//! three PNG charts (analysis dashboard, correlation heatmap, revenue/cost
//! timeline) from an already computed analysis.

pub mod charts;
pub mod console;
pub mod facts;
pub mod html;
pub mod themes;

pub use insights_data as data;

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;

    use chrono::{NaiveDate, NaiveDateTime};
    use insights_data::analysis::{analyze_campaigns, AnalysisResult};
    use insights_data::reader::Table;

    pub const CSV: &str = "\
campana_id,plataforma,tipo_campana,audiencia_objetivo,fecha_campana,presupuesto_diario,impresiones,clicks,conversiones,costo_total,revenue_generado,ctr,conversion_rate,cpa,roas,engagement_rate
A,Facebook Ads,Conversion,25-34,2024-03-01,50,10000,250,20,100,500,2.5,8.0,5.0,5.0,3.1
B,TikTok Ads,Awareness,18-24,2024-03-05,40,8000,400,5,100,50,35.0,1.25,20.0,0.5,6.2
C,Facebook Ads,Retargeting,25-34,2024-03-09,80,20000,600,40,200,600,3.0,6.67,5.0,3.0,2.4
";

    pub fn table() -> Table {
        Table::from_reader(Path::new("campaigns.csv"), CSV.as_bytes(), "fecha_campana").unwrap()
    }

    pub fn analysis() -> AnalysisResult {
        analyze_campaigns(&table()).unwrap()
    }

    pub fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }
}
