use scout_core::{
    AppViewModel, Catalog, ChannelEstimate, ProfitView, ScheduleStatus, SubscriptionStatus,
    SubscriptionView, MISSING_INPUT_HINT,
};

/// Result block for `search` and `resume`.
pub fn render_results(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(term) = &view.last_search_term {
        lines.push(format!("Results for \"{term}\":"));
        for link in &view.result_links {
            lines.push(format!("  {:<22} {}", link.name, link.url));
        }
        if !view.result_links.is_empty() {
            lines.push(format!(
                "Opened {} of {}.",
                view.opened_count,
                view.result_links.len()
            ));
        }
    } else if view.current_address.is_some() {
        lines.push(format!("Restored search: \"{}\"", view.search_term));
        let selected: Vec<&str> = view
            .marketplaces
            .iter()
            .filter(|m| m.selected)
            .map(|m| m.name.as_str())
            .collect();
        if !selected.is_empty() {
            lines.push(format!("  Marketplaces: {}", selected.join(", ")));
        }
        if view.opened_count > 0 {
            lines.push(format!("Opened {}.", view.opened_count));
        }
    }

    if let Some(status) = schedule_label(view.schedule) {
        lines.push(status);
    }
    if let Some(notice) = &view.notice {
        lines.push(format!("Notice: {notice}"));
    }
    if let Some(address) = &view.current_address {
        lines.push(format!("Address: {address}"));
    }
    lines
}

/// One-line progress summary while navigations are still arriving.
pub fn progress_line(view: &AppViewModel) -> Option<String> {
    if view.handoff_pending {
        return Some("Handing off to a new tab...".to_string());
    }
    match view.schedule {
        ScheduleStatus::Running { remaining } => Some(format!(
            "Opened {}, {} still queued (type stop, resume or reset)",
            view.opened_count, remaining
        )),
        ScheduleStatus::Stopped { remaining } => Some(format!(
            "Stopped with {remaining} queued (type resume or reset)"
        )),
        ScheduleStatus::Idle => None,
    }
}

fn schedule_label(schedule: ScheduleStatus) -> Option<String> {
    match schedule {
        ScheduleStatus::Idle => None,
        ScheduleStatus::Running { remaining } => Some(format!("Schedule running, {remaining} left.")),
        ScheduleStatus::Stopped { remaining } => Some(format!("Schedule stopped, {remaining} left.")),
    }
}

pub fn render_profit(view: &ProfitView) -> Vec<String> {
    match &view.estimate {
        Some(estimate) => vec![
            channel_line("Amazon", &estimate.amazon),
            channel_line("eBay", &estimate.ebay),
        ],
        None if view.show_hint => vec![MISSING_INPUT_HINT.to_string()],
        None => Vec::new(),
    }
}

fn channel_line(name: &str, estimate: &ChannelEstimate) -> String {
    let roi = match estimate.roi_percent {
        Some(roi) => format!("{roi:.1}%"),
        None => "n/a".to_string(),
    };
    format!("{name:<7} profit {}  ROI {roi}", money(estimate.profit))
}

fn money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${amount:.2}")
    }
}

pub fn render_subscription(view: &SubscriptionView) -> Vec<String> {
    let mut lines = vec![view.pitch.clone()];
    match &view.status {
        Some(SubscriptionStatus::Subscribed { email }) => {
            lines.push(format!("Thanks! {email} is subscribed."));
        }
        Some(SubscriptionStatus::Rejected(reason)) => {
            lines.push(format!("Not subscribed: {reason}."));
        }
        None => {}
    }
    lines
}

pub fn render_catalog(catalog: &Catalog) -> Vec<String> {
    catalog
        .iter()
        .map(|m| {
            let conditions: Vec<&str> = m
                .supported_conditions()
                .into_iter()
                .map(|c| c.as_str())
                .collect();
            let conditions = if conditions.is_empty() {
                "-".to_string()
            } else {
                conditions.join(", ")
            };
            format!("{:<10} {:<22} conditions: {}", m.id.as_str(), m.name, conditions)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scout_core::{MarketplaceId, ProfitEstimate, ResultLink};

    #[test]
    fn renders_result_links_and_progress() {
        let view = AppViewModel {
            last_search_term: Some("desk".to_string()),
            result_links: vec![ResultLink {
                target: MarketplaceId::Ebay,
                name: "eBay".to_string(),
                icon: "ebay.svg".to_string(),
                url: "https://www.ebay.com/sch/i.html?_nkw=desk".to_string(),
            }],
            opened_count: 1,
            ..AppViewModel::default()
        };

        assert_eq!(
            render_results(&view),
            vec![
                "Results for \"desk\":".to_string(),
                format!("  {:<22} https://www.ebay.com/sch/i.html?_nkw=desk", "eBay"),
                "Opened 1 of 1.".to_string(),
            ]
        );
        assert_eq!(progress_line(&view), None);
    }

    #[test]
    fn notice_and_stopped_schedule_are_shown() {
        let view = AppViewModel {
            last_search_term: Some("desk".to_string()),
            schedule: ScheduleStatus::Stopped { remaining: 2 },
            notice: Some("blocked".to_string()),
            ..AppViewModel::default()
        };

        let lines = render_results(&view);
        assert!(lines.contains(&"Schedule stopped, 2 left.".to_string()));
        assert!(lines.contains(&"Notice: blocked".to_string()));
        assert_eq!(
            progress_line(&view).as_deref(),
            Some("Stopped with 2 queued (type resume or reset)")
        );
    }

    #[test]
    fn profit_lines_format_money_and_roi() {
        let view = ProfitView {
            estimate: Some(ProfitEstimate {
                amazon: ChannelEstimate {
                    profit: 75.0,
                    roi_percent: Some(150.0),
                },
                ebay: ChannelEstimate {
                    profit: -3.5,
                    roi_percent: None,
                },
            }),
            show_hint: false,
        };

        assert_eq!(
            render_profit(&view),
            vec![
                "Amazon  profit $75.00  ROI 150.0%".to_string(),
                "eBay    profit -$3.50  ROI n/a".to_string(),
            ]
        );
    }

    #[test]
    fn profit_hint_when_inputs_are_incomplete() {
        let view = ProfitView {
            estimate: None,
            show_hint: true,
        };
        assert_eq!(render_profit(&view), vec![MISSING_INPUT_HINT.to_string()]);
    }

    #[test]
    fn catalog_lists_conditions() {
        let lines = render_catalog(&Catalog::builtin());
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("facebook"));
        assert!(lines[1].contains("conditions: new, renewed, used"));
    }
}
