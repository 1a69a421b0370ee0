use crate::model::{
    poll::Poll,
    view::{PollField, PollSelect, PollView, CLOSED_COLOR, OPEN_COLOR, RESULT_COLOR, VOTE_SELECT_ID},
};

fn mentions(voters: &[&str]) -> String {
    voters
        .iter()
        .map(|id| format!("<@{}>", id))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the public display of a poll: one field per option with its vote count,
/// the status annotation under the last option and the selection menu.
pub fn render_poll(title: &str, poll: &Poll) -> PollView {
    let tally = poll.tally();
    let last = tally.len().saturating_sub(1);

    let fields = tally
        .iter()
        .enumerate()
        .map(|(index, (label, voters))| {
            let mut value = format!("Votes: {:3}", voters.len());
            if poll.show_voters && !voters.is_empty() {
                value.push('\n');
                value.push_str(&mentions(voters));
            }
            if index == last {
                value.push('\n');
                value.push_str(&poll.status_text());
            }
            PollField {
                name: label.to_string(),
                value,
                vote_count: voters.len(),
            }
        })
        .collect();

    let footer = format!(
        "{}\n{}",
        "≡".repeat(43),
        if poll.closed {
            "Voting is closed"
        } else {
            "Pick from the menu below to vote"
        }
    );

    PollView {
        author: "Poll".to_string(),
        title: title.to_string(),
        color: if poll.closed { CLOSED_COLOR } else { OPEN_COLOR },
        fields,
        footer: Some(footer),
        select: Some(render_select(poll)),
    }
}

fn render_select(poll: &Poll) -> PollSelect {
    let max_values = (poll.max_selections as usize).min(poll.options.len()).max(1);

    PollSelect {
        custom_id: VOTE_SELECT_ID.to_string(),
        placeholder: if max_values == 1 {
            "Select 1 option".to_string()
        } else {
            format!("Select up to {} options", max_values)
        },
        options: poll
            .options
            .iter()
            .enumerate()
            .map(|(index, label)| (label.clone(), index.to_string()))
            .collect(),
        min_values: 1,
        max_values: max_values as u8,
        disabled: poll.closed,
    }
}

/// Renders the private result listing: every option with the members who picked it.
pub fn render_result(title: &str, poll: &Poll) -> PollView {
    let fields = poll
        .tally()
        .into_iter()
        .map(|(label, voters)| PollField {
            name: label.to_string(),
            // zero-width joiner keeps the field value non-empty
            value: format!("\u{200D}{}", mentions(&voters)),
            vote_count: voters.len(),
        })
        .collect();

    PollView {
        author: "Poll result".to_string(),
        title: title.to_string(),
        color: RESULT_COLOR,
        fields,
        footer: None,
        select: None,
    }
}
