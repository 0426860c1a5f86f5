mod bootstrap;

use anyhow::{Context, Result};
use plotter_core::settings::Settings;
use plotter_data::aggregator::{DayRange, RegionFilter};
use plotter_data::analysis::{analyze, AnalysisRequest, AnalysisResult};
use plotter_ui::app::App;
use plotter_ui::table_view;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("COVID-19 plotter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Country: {}, Chart: {}, Output: {}, Theme: {}",
        settings.country,
        settings.chart,
        settings.output,
        settings.theme
    );

    let request = build_request(&settings)?;
    let analysis = analyze(&request)
        .with_context(|| format!("loading reports from {}", request.root.display()))?;

    match settings.output.as_str() {
        "json" => println!("{}", render_json(&settings, &request.filter, &analysis)?),
        "table" => print!("{}", render_table(&request.filter, &analysis)),
        _ => {
            let app = App::new(
                &settings.theme,
                request.filter.label(),
                analysis.points,
                settings.chart_kind(),
                settings.window_len(),
            );
            app.run()?;
        }
    }

    Ok(())
}

/// Resolve the data root, region and day range from the CLI.
fn build_request(settings: &Settings) -> Result<AnalysisRequest> {
    let root = settings
        .data
        .clone()
        .unwrap_or_else(bootstrap::discover_data_path);
    tracing::debug!("Using data root {}", root.display());

    let filter = RegionFilter::from_parts(
        settings.country.clone(),
        settings.province.clone(),
        settings.county.clone(),
    )?;

    Ok(AnalysisRequest {
        root,
        filter,
        range: DayRange::new(settings.min_day, settings.max_day),
    })
}

/// Points, metadata and the selected chart series as pretty JSON.
fn render_json(
    settings: &Settings,
    filter: &RegionFilter,
    analysis: &AnalysisResult,
) -> Result<String> {
    let kind = settings.chart_kind();
    let series =
        plotter_core::series::chart_series(&analysis.points, kind, settings.window_len())?;

    let document = serde_json::json!({
        "title": filter.title(),
        "chart": kind,
        "window": settings.window,
        "metadata": analysis.metadata,
        "points": analysis.points,
        "series": series,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Title line followed by the aligned table.
fn render_table(filter: &RegionFilter, analysis: &AnalysisResult) -> String {
    let rows = table_view::rows_from_points(&analysis.points);
    format!("{}\n\n{}", filter.title(), table_view::format_plain_table(&rows))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use plotter_core::PlotterError;
    use plotter_data::reader::DAILY_REPORTS_DIR;
    use std::path::Path;
    use tempfile::TempDir;

    const HEADER: &str = "Province/State,Country/Region,Last Update,Confirmed,Deaths,Recovered";

    fn settings(extra: &[&str]) -> Settings {
        let mut args = vec!["covid-plotter"];
        args.extend_from_slice(extra);
        Settings::load_from_args(args)
    }

    fn write_reports(root: &Path) {
        let dir = root.join(DAILY_REPORTS_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        for (name, cases) in [("03-01-2020.csv", 10), ("03-02-2020.csv", 25), ("03-03-2020.csv", 70)] {
            let body = format!("{HEADER}\nWashington,US,x,{cases},1,0\nHubei,Mainland China,x,5,0,0\n");
            std::fs::write(dir.join(name), body).unwrap();
        }
    }

    fn analysis_for(root: &Path, extra: &[&str]) -> (Settings, AnalysisRequest, AnalysisResult) {
        let data = root.to_str().unwrap();
        let mut args = vec!["--data", data];
        args.extend_from_slice(extra);
        let settings = settings(&args);
        let request = build_request(&settings).unwrap();
        let analysis = analyze(&request).unwrap();
        (settings, request, analysis)
    }

    // ── build_request ─────────────────────────────────────────────────────────

    #[test]
    fn test_build_request_from_flags() {
        let s = settings(&[
            "--data", "/tmp/covid", "--country", "US", "--province", "New York",
            "--county", "Kings", "--min-day", "40", "--max-day", "60",
        ]);
        let request = build_request(&s).unwrap();
        assert_eq!(request.root, Path::new("/tmp/covid"));
        assert_eq!(request.filter.label(), "Kings, New York, US");
        assert_eq!(request.range, DayRange::new(Some(40), Some(60)));
    }

    #[test]
    fn test_build_request_county_without_province() {
        let s = settings(&["--data", "/tmp/covid", "--county", "Kings"]);
        let err = build_request(&s).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlotterError>(),
            Some(PlotterError::Config(_))
        ));
    }

    #[test]
    fn test_build_request_discovers_root_when_unset() {
        let request = build_request(&settings(&[])).unwrap();
        assert!(request.root.ends_with(bootstrap::DATA_DIR_NAME));
    }

    // ── Output modes ──────────────────────────────────────────────────────────

    #[test]
    fn test_render_table_output() {
        let tmp = TempDir::new().unwrap();
        write_reports(tmp.path());
        let (_, request, analysis) = analysis_for(tmp.path(), &[]);

        let text = render_table(&request.filter, &analysis);
        assert!(text.starts_with("Total US Cases\n"));
        assert!(text.contains("2020-03-03"));
        assert!(text.contains("+45"));
    }

    #[test]
    fn test_render_json_output() {
        let tmp = TempDir::new().unwrap();
        write_reports(tmp.path());
        let (settings, request, analysis) =
            analysis_for(tmp.path(), &["--country", "China", "--chart", "daily"]);

        let json: serde_json::Value =
            serde_json::from_str(&render_json(&settings, &request.filter, &analysis).unwrap())
                .unwrap();
        assert_eq!(json["title"], "Total China Cases");
        assert_eq!(json["chart"], "daily");
        assert_eq!(json["points"].as_array().unwrap().len(), 3);
        assert_eq!(json["metadata"]["snapshots_loaded"], 3);
        assert_eq!(json["series"][0]["metric"], "confirmed");
        assert_eq!(json["series"][0]["points"][0][1], 0.0);
    }

    #[test]
    fn test_render_json_window_too_long() {
        let tmp = TempDir::new().unwrap();
        write_reports(tmp.path());
        let (settings, request, analysis) =
            analysis_for(tmp.path(), &["--chart", "average", "--window", "5"]);

        let err = render_json(&settings, &request.filter, &analysis).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlotterError>(),
            Some(PlotterError::InvalidWindow { window: 5, len: 2 })
        ));
    }
}
