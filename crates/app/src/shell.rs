//! Line-oriented front end over a [`Session`].
//!
//! Store edits are applied as soon as a line is read. Filter edits are echoed
//! right away and handed to the [`RecomputeWorker`]; views it publishes are
//! applied between input lines.
use std::{sync::Arc, time::Duration};

use engine::{DerivedView, FilterCriteria, RecomputeWorker, Session};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    command::{self, Command, FilterField},
    error::Result,
};

pub struct Shell {
    session: Session,
    worker: RecomputeWorker,
}

impl Shell {
    pub fn new(session: Session, settle: Duration) -> Self {
        Self {
            session,
            worker: RecomputeWorker::spawn(settle),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{}", command::HELP);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match command::parse(&line) {
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(command)) => self.execute(command)?,
                        Ok(None) => {}
                        Err(message) => println!("error: {message}"),
                    }
                }
                view = self.worker.next_view() => {
                    self.adopt(view?)?;
                }
            }
        }

        self.worker.shutdown();
        Ok(())
    }

    fn adopt(&mut self, view: Arc<DerivedView>) -> Result<()> {
        if self.session.apply(view) {
            tracing::debug!(filter = ?self.session.committed_filter(), "filter committed");
        } else {
            // Dropped as stale; ask again for whatever is newest now.
            self.request_recompute()?;
        }
        Ok(())
    }

    fn request_recompute(&self) -> Result<()> {
        if let Some(request) = self.session.recompute_request() {
            self.worker.request(request)?;
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Add(draft) => match draft.validate() {
                Ok(()) => {
                    let id = self.session.add(draft);
                    println!("added #{id}");
                    self.request_recompute()?;
                }
                Err(err) => println!("error: {err}"),
            },
            Command::Edit(id, draft) => {
                if let Err(err) = draft.validate() {
                    println!("error: {err}");
                    return Ok(());
                }
                match self.session.replace(id, draft) {
                    Ok(()) => println!("updated #{id}"),
                    Err(err) => println!("error: {err}"),
                }
                self.request_recompute()?;
            }
            Command::Remove(id) => {
                match self.session.remove(id) {
                    Ok(removed) => println!("deleted {removed}"),
                    Err(err) => println!("error: {err}"),
                }
                self.request_recompute()?;
            }
            Command::Filter(field, value) => {
                let current = self.session.filter().clone();
                let criteria = match field {
                    FilterField::Text => current.with_text(value),
                    FilterField::Category => current.with_category(value),
                    FilterField::Start => current.with_start(value),
                    FilterField::End => current.with_end(value),
                };
                self.edit_filter(criteria)?;
            }
            Command::Clear => self.edit_filter(FilterCriteria::cleared())?,
            Command::List => self.print_list(),
            Command::Summary => self.print_summary(),
            Command::Distribution => self.print_distribution(),
            Command::Categories => println!("{}", self.session.category_options().join(", ")),
            Command::Json => {
                let view = self.session.view();
                println!("{}", serde_json::to_string_pretty(&*view)?);
            }
            Command::Help => println!("{}", command::HELP),
            Command::Quit => {}
        }
        Ok(())
    }

    fn edit_filter(&mut self, criteria: FilterCriteria) -> Result<()> {
        if let Err(err) = criteria.validate() {
            println!("warning: {err}");
        }
        self.session.set_filter(criteria);
        println!("filter: {}", describe(self.session.filter()));
        self.request_recompute()
    }

    fn pending_marker(&self) -> &'static str {
        if self.session.is_pending() {
            " (updating...)"
        } else {
            ""
        }
    }

    fn print_list(&mut self) {
        let marker = self.pending_marker();
        let view = self.session.view();
        println!("{} expense(s){marker}", view.expenses.len());
        if view.expenses.is_empty() {
            println!("  no expenses found");
        }
        for expense in &view.expenses {
            println!("  {expense}");
        }
    }

    fn print_summary(&mut self) {
        let marker = self.pending_marker();
        let summary = self.session.summary();
        let or_none = |label: Option<&str>| label.unwrap_or("None").to_string();
        println!("summary{marker}");
        println!("  total:       {} ({} items)", summary.total, summary.count);
        println!(
            "  highest:     {}",
            or_none(summary.highest.as_ref().map(|e| e.description.as_str()))
        );
        println!(
            "  most recent: {}",
            or_none(summary.most_recent.as_ref().map(|e| e.description.as_str()))
        );
        println!(
            "  top category: {} {}",
            or_none(summary.top_category.as_deref()),
            summary.top_category_amount
        );
    }

    fn print_distribution(&mut self) {
        let distribution = self.session.distribution();
        if distribution.is_empty() {
            println!("no expense data available");
            return;
        }
        let total = distribution.total().as_major();
        for (category, amount) in distribution.iter() {
            let share = if total > 0.0 {
                amount.as_major() / total * 100.0
            } else {
                0.0
            };
            let amount = amount.to_string();
            println!("  {category:<16} {amount:>12} {share:>5.1}%");
        }
    }
}

fn describe(criteria: &FilterCriteria) -> String {
    if criteria.is_cleared() {
        return "(none)".to_string();
    }
    format!(
        "text={:?} category={:?} range=[{}, {}]",
        criteria.text, criteria.category, criteria.date_range.start, criteria.date_range.end
    )
}
