#[cfg(test)]
mod tests {
    use crate::errors::ExtractionError;
    use crate::figures::{build_result, extract_figures, format_figure, FORMULA_SEPARATOR};
    use crate::models::RecognizedFragment;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn fragments(texts: &[&str]) -> Vec<RecognizedFragment> {
        texts.iter().map(|t| RecognizedFragment::new(*t, 0.5)).collect()
    }

    #[test]
    fn test_commas_are_thousands_separators() {
        let figures = extract_figures(&fragments(&["1,234 and 5,678.5"]));
        assert_eq!(figures, vec![1234.0, 5678.5]);
    }

    #[test]
    fn test_order_follows_fragments_then_matches() {
        let figures = extract_figures(&fragments(&["3 then 1", "no digits", "2.5x7"]));
        assert_eq!(figures, vec![3.0, 1.0, 2.5, 7.0]);
    }

    #[test]
    fn test_pattern_edge_cases() {
        // No sign handling, a dangling point is not part of the number,
        // and a second decimal point starts a new figure
        assert_eq!(extract_figures(&fragments(&["-5"])), vec![5.0]);
        assert_eq!(extract_figures(&fragments(&["12."])), vec![12.0]);
        assert_eq!(extract_figures(&fragments(&["1.2.3"])), vec![1.2, 3.0]);
        assert_eq!(extract_figures(&fragments(&["1e5"])), vec![1.0, 5.0]);
        assert_eq!(extract_figures(&fragments(&[".75"])), vec![75.0]);
        assert_eq!(extract_figures(&fragments(&["007"])), vec![7.0]);
    }

    #[test]
    fn test_confidence_is_not_a_filter() {
        let low = vec![RecognizedFragment::new("42", 0.01)];
        assert_eq!(extract_figures(&low), vec![42.0]);
    }

    #[test]
    fn test_no_digits_contributes_nothing() {
        assert!(extract_figures(&fragments(&["no numbers here"])).is_empty());
        assert!(extract_figures(&[]).is_empty());
    }

    #[test]
    fn test_build_result_scenario_a() {
        let figures = extract_figures(&fragments(&["Total: 12", "and 8.5"]));
        assert_eq!(figures, vec![12.0, 8.5]);

        let result = build_result(&figures).unwrap();
        assert_eq!(result.formula, "12.0 + 8.5");
        assert_eq!(result.result, "20.5");
    }

    #[test]
    fn test_build_result_single_figure() {
        let result = build_result(&[1234.0]).unwrap();
        assert_eq!(result.formula, "1234.0");
        assert_eq!(result.result, "1234.0");
    }

    #[test]
    fn test_build_result_empty_is_error() {
        assert!(matches!(build_result(&[]), Err(ExtractionError::NoFiguresFound)));
    }

    #[test]
    fn test_sum_uses_plain_float_addition() {
        let result = build_result(&[0.1, 0.2]).unwrap();
        assert_eq!(result.formula, "0.1 + 0.2");
        assert_eq!(result.result, "0.30000000000000004");
    }

    #[test]
    fn test_format_figure_plain_range() {
        assert_eq!(format_figure(0.0), "0.0");
        assert_eq!(format_figure(12.0), "12.0");
        assert_eq!(format_figure(8.5), "8.5");
        assert_eq!(format_figure(1234.5678), "1234.5678");
        assert_eq!(format_figure(0.001), "0.001");
        assert_eq!(format_figure(0.0001), "0.0001");
        assert_eq!(format_figure(1e15), "1000000000000000.0");
        assert_eq!(format_figure(123456789.0), "123456789.0");
        assert_eq!(format_figure(-2.5), "-2.5");
    }

    #[test]
    fn test_format_figure_scientific_range() {
        assert_eq!(format_figure(1e16), "1e+16");
        assert_eq!(format_figure(1.5e16), "1.5e+16");
        assert_eq!(format_figure(123456789012345678.0), "1.2345678901234568e+17");
        assert_eq!(format_figure(1e-5), "1e-05");
        assert_eq!(format_figure(2.5e-7), "2.5e-07");
        assert_eq!(format_figure(1e100), "1e+100");
        assert_eq!(format_figure(f64::INFINITY), "inf");
    }

    #[test]
    fn test_huge_digit_run_renders_as_inf() {
        let digits = "9".repeat(400);
        let figures = extract_figures(&fragments(&[digits.as_str()]));
        assert_eq!(figures.len(), 1);
        assert!(figures[0].is_infinite());
        assert_eq!(build_result(&figures).unwrap().result, "inf");
    }

    fn random_fragment_texts(rng: &mut StdRng) -> (Vec<String>, Vec<f64>) {
        let mut texts = Vec::new();
        let mut expected = Vec::new();

        for _ in 0..rng.gen_range(0..6) {
            let mut text = String::new();
            for _ in 0..rng.gen_range(0..4) {
                let integer: u64 = rng.gen_range(0..5_000_000);
                let with_fraction = rng.gen_bool(0.5);
                let fraction: u32 = rng.gen_range(1..1000);

                let token = if with_fraction {
                    format!("{}.{}", integer, fraction)
                } else {
                    integer.to_string()
                };
                expected.push(token.parse::<f64>().unwrap());

                // Thousands separators on some integers
                let rendered = if !with_fraction && integer >= 1000 && rng.gen_bool(0.5) {
                    format!("{},{:03}", integer / 1000, integer % 1000)
                } else {
                    token
                };

                text.push_str(["Total ", "x", " and ", ": $", "("][rng.gen_range(0..5)]);
                text.push_str(&rendered);
                text.push_str([" ", ")", " USD ", "%"][rng.gen_range(0..4)]);
            }
            texts.push(text);
        }

        (texts, expected)
    }

    #[test]
    fn test_random_fragments_preserve_order_and_values() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let (texts, expected) = random_fragment_texts(&mut rng);
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            assert_eq!(extract_figures(&fragments(&refs)), expected, "texts: {:?}", texts);
        }
    }

    #[test]
    fn test_random_results_round_trip_through_formula() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let len = rng.gen_range(1..12);
            let figures: Vec<f64> = (0..len)
                .map(|_| match rng.gen_range(0..3) {
                    0 => rng.gen_range(0..100_000u32) as f64,
                    1 => rng.gen::<f64>() * 1e6,
                    _ => rng.gen::<f64>() * 1e-6,
                })
                .collect();

            let result = build_result(&figures).unwrap();

            let parsed: Vec<f64> = result
                .formula
                .split(FORMULA_SEPARATOR)
                .map(|token| token.parse::<f64>().unwrap())
                .collect();
            assert_eq!(parsed, figures);

            let expected_sum: f64 = figures.iter().fold(0.0, |acc, f| acc + f);
            let actual_sum: f64 = result.result.parse().unwrap();
            let tolerance = 1e-9 * expected_sum.abs().max(1.0);
            assert!((actual_sum - expected_sum).abs() <= tolerance);
        }
    }
}
