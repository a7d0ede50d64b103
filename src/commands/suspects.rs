use super::context::{CommandContext, emit, runtime, to_json};
use crate::api;
use crate::cli::{OutputFormat, SuspectsArgs};
use crate::fs::default_fs;
use crate::render::Markdown;
use crate::render::text::SuspectTable;
use crate::style;
use crate::widgets::{RiskBand, SuspectFilter, SuspectRow};

const BANDS: [RiskBand; 3] = [RiskBand::Critical, RiskBand::Elevated, RiskBand::Normal];

pub fn suspect_filter(args: &SuspectsArgs) -> SuspectFilter {
    SuspectFilter {
        search: args.search.clone().unwrap_or_default(),
        circular: !args.no_circular,
        smurfing: !args.no_smurfing,
    }
}

/// How many listed suspects fall in each score band, most severe first.
pub fn band_counts(rows: &[SuspectRow]) -> [(RiskBand, usize); 3] {
    BANDS.map(|band| (band, rows.iter().filter(|row| row.band == band).count()))
}

fn print_band_tally(rows: &[SuspectRow]) {
    style::header("Score bands");
    for (band, count) in band_counts(rows) {
        println!("{}", style::metric(&style::band(band), count));
    }
}

pub fn cmd_suspects(args: SuspectsArgs, api_url: Option<&str>) -> i32 {
    let ctx = match CommandContext::new(api_url) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let rows = match rt.block_on(api::suspects(&ctx.client, &suspect_filter(&args))) {
        Ok(rows) => rows,
        Err(e) => {
            style::error(&format!("Failed to load suspects: {}", e));
            return 1;
        }
    };

    match args.format {
        OutputFormat::Markdown => {
            let code = emit(&SuspectTable(&rows).to_markdown(), None, true, default_fs());
            if code == 0 && style::is_terminal() && !rows.is_empty() {
                print_band_tally(&rows);
            }
            code
        }
        OutputFormat::Json => match to_json(&rows) {
            Ok(json) => emit(&json, None, false, default_fs()),
            Err(code) => code,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Suspect;
    use crate::widgets::suspect_rows;

    #[test]
    fn test_flags_map_to_filter() {
        let args = SuspectsArgs {
            search: Some("0xab".into()),
            no_smurfing: true,
            ..SuspectsArgs::default()
        };
        let filter = suspect_filter(&args);
        assert_eq!(filter.search, "0xab");
        assert!(filter.circular);
        assert!(!filter.smurfing);
    }

    #[test]
    fn test_band_counts_follow_suspect_cutoffs() {
        let mut suspects = vec![Suspect::new("a"), Suspect::new("b"), Suspect::new("c")];
        suspects[0].score = 95.0;
        suspects[1].score = 71.0;
        suspects[2].score = 70.0;
        let rows = suspect_rows(&suspects, &SuspectFilter::default(), None);
        assert_eq!(
            band_counts(&rows),
            [(RiskBand::Critical, 1), (RiskBand::Elevated, 1), (RiskBand::Normal, 1)]
        );
    }
}
