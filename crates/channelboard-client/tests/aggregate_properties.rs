use channelboard_client::analytics::{RawRow, ReportVariant, aggregate, parse_rows};

fn rows_from(text: &str) -> Vec<RawRow> {
    let parsed = parse_rows(text);
    assert!(parsed.is_ok(), "parse failed: {:?}", parsed.as_ref().err());
    parsed.unwrap_or_default()
}

fn typed_row(transaction_type: &str, amount: &str) -> RawRow {
    [
        ("Transaction Type", transaction_type),
        ("Transaction Amount", amount),
    ]
    .into_iter()
    .collect()
}

#[test]
fn zero_rows_produce_an_empty_result() {
    for variant in [ReportVariant::Store, ReportVariant::Direct] {
        let result = aggregate(&Vec::<RawRow>::new(), variant);
        assert_eq!(result.summary.rows_read, 0);
        assert_eq!(result.summary.installs, 0);
        assert_eq!(result.summary.uninstalls, 0);
        assert_eq!(result.summary.net_installs(), 0);
        assert_eq!(result.summary.gross_revenue, 0.0);
        assert!(result.top_transactions.is_empty());
        assert!(result.top_titles.unwrap_or_default().is_empty());
        assert!(
            result
                .monthly_revenue
                .unwrap_or_default()
                .iter()
                .next()
                .is_none()
        );
    }
}

#[test]
fn all_purchases_count_as_installs() {
    let rows = (0..7)
        .map(|_| typed_row("Purchase", "1"))
        .collect::<Vec<RawRow>>();
    let result = aggregate(&rows, ReportVariant::Direct);
    assert_eq!(result.summary.installs, 7);
    assert_eq!(result.summary.uninstalls, 0);
    assert_eq!(result.summary.net_installs(), 7);
}

#[test]
fn purchase_and_cancellation_with_separator_amounts() {
    let rows = vec![
        typed_row("purchase", "1,200.50"),
        typed_row("cancellation", "100"),
    ];
    let result = aggregate(&rows, ReportVariant::Direct);
    assert_eq!(result.summary.installs, 1);
    assert_eq!(result.summary.uninstalls, 1);
    assert_eq!(result.summary.net_installs(), 0);
    assert!((result.summary.gross_revenue - 1300.50).abs() < 1e-9);
}

#[test]
fn more_cancellations_than_purchases_go_negative() {
    let rows = vec![
        typed_row("Cancellation", "-1"),
        typed_row("Cancellation", "-1"),
        typed_row("Purchase", "1"),
    ];
    let result = aggregate(&rows, ReportVariant::Store);
    assert_eq!(result.summary.net_installs(), -1);
}

#[test]
fn title_ties_keep_first_seen_order() {
    let mut text = String::from("Video Title,Transaction Amount\n");
    for title in ["A", "B", "A", "C", "A", "B", "C", "A", "B", "C", "A"] {
        text.push_str(&format!("{title},1\n"));
    }

    let result = aggregate(&rows_from(&text), ReportVariant::Direct);
    let ranking = result
        .top_titles
        .unwrap_or_default()
        .into_iter()
        .map(|entry| (entry.title, entry.count))
        .collect::<Vec<(String, i64)>>();
    assert_eq!(
        ranking,
        vec![
            ("A".to_string(), 5),
            ("B".to_string(), 3),
            ("C".to_string(), 3),
        ]
    );
}

#[test]
fn empty_title_cells_are_not_ranked() {
    let text = "Video Title,Transaction Amount\n\
                Intro,1\n\
                ,1\n\
                ,1\n\
                Outro,1\n";
    let result = aggregate(&rows_from(text), ReportVariant::Direct);
    let titles = result
        .top_titles
        .unwrap_or_default()
        .into_iter()
        .map(|entry| entry.title)
        .collect::<Vec<String>>();
    assert_eq!(titles, vec!["Intro".to_string(), "Outro".to_string()]);
    assert_eq!(result.summary.rows_read, 4);
}

#[test]
fn fifteen_positive_rows_keep_the_first_ten_in_input_order() {
    let rows = (1..=15)
        .map(|index| typed_row("Purchase", &format!("{index}.00")))
        .collect::<Vec<RawRow>>();

    for variant in [ReportVariant::Store, ReportVariant::Direct] {
        let result = aggregate(&rows, variant);
        let amounts = result
            .top_transactions
            .iter()
            .map(|record| record.amount)
            .collect::<Vec<f64>>();
        assert_eq!(
            amounts,
            (1..=10).map(f64::from).collect::<Vec<f64>>(),
            "variant {variant:?}"
        );
    }
}

#[test]
fn store_variant_lists_only_positive_amounts() {
    let rows = vec![
        typed_row("Purchase", "0"),
        typed_row("Cancellation", "-4.99"),
        typed_row("Purchase", "12,345.67"),
    ];
    let result = aggregate(&rows, ReportVariant::Store);
    assert_eq!(result.top_transactions.len(), 1);
    assert!((result.top_transactions[0].amount - 12345.67).abs() < 1e-9);
    assert!((result.summary.gross_revenue - (12345.67 - 4.99)).abs() < 1e-9);
}

#[test]
fn unrecognized_types_still_add_revenue() {
    let rows = vec![typed_row("Refund", "3.25"), typed_row("", "1.75")];
    let result = aggregate(&rows, ReportVariant::Store);
    assert_eq!(result.summary.installs, 0);
    assert_eq!(result.summary.uninstalls, 0);
    assert!((result.summary.gross_revenue - 5.0).abs() < 1e-9);
}

#[test]
fn direct_report_buckets_months_and_invalid_dates() {
    let text = "Transaction Date,Transaction Amount\n\
                2024-01-15,10.00\n\
                2024-01-20,5.00\n\
                2024-02-01,-5.00\n\
                yesterday,1.50\n";
    let result = aggregate(&rows_from(text), ReportVariant::Direct);
    let monthly = result.monthly_revenue.unwrap_or_default();
    let buckets = monthly
        .iter()
        .map(|(month, total)| (month.to_string(), *total))
        .collect::<Vec<(String, f64)>>();
    assert_eq!(
        buckets,
        vec![
            ("2024-1".to_string(), 15.0),
            ("2024-2".to_string(), -5.0),
            ("invalid-date".to_string(), 1.5),
        ]
    );
}

#[test]
fn gross_and_net_revenue_are_independent_sums() {
    let text = "Transaction Type,Transaction Amount,Developer Rev Share\n\
                Purchase,10,7\n\
                Purchase,,3\n\
                Purchase,5,\n";
    let result = aggregate(&rows_from(text), ReportVariant::Store);
    assert!((result.summary.gross_revenue - 15.0).abs() < 1e-9);
    assert_eq!(result.summary.net_revenue, Some(10.0));
}
