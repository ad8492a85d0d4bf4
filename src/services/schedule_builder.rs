use chrono::NaiveTime;

use crate::models::plan::{EnergyLevel, TimelineEntry};
use crate::services::schedule_utils;
use crate::services::time_budget::TimeBudget;

pub const DAY_START_HOUR: u32 = 9;
pub const BREAK_MINUTES: u32 = 15;
pub const BREAK_TASK: &str = "Quick Break";
pub const BREAK_DESCRIPTION: &str = "Rest and recharge";
pub const FLEXIBLE_TASK: &str = "Flexible Work Session";
pub const FLEXIBLE_DESCRIPTION: &str = "Work on any pending tasks or take time to relax";

/// Deterministic timeline construction from priority tasks and a minute budget.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleBuilder {
    day_start: NaiveTime,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self {
            day_start: schedule_utils::to_naive_time(DAY_START_HOUR * 60),
        }
    }

    /// Lays out work blocks in task order with a break after each one when
    /// enough budget is left, then fills any remainder with a flexible block.
    /// The result never exceeds the budget and its entries are contiguous.
    pub fn build(
        &self,
        tasks: &[String],
        energy: EnergyLevel,
        mut budget: TimeBudget,
    ) -> Vec<TimelineEntry> {
        let base_minutes = energy.base_task_minutes();
        let mut cursor = TimelineCursor::new(self.day_start);

        for task in tasks {
            if budget.is_exhausted() {
                break;
            }

            let minutes = budget.consume(base_minutes);
            cursor.push(
                task.clone(),
                Some(format!("Focus on completing {task}")),
                minutes,
            );

            // A break needs room for at least one more minute after it.
            if budget.remaining() > BREAK_MINUTES {
                let minutes = budget.consume(BREAK_MINUTES);
                cursor.push(
                    BREAK_TASK.to_string(),
                    Some(BREAK_DESCRIPTION.to_string()),
                    minutes,
                );
            }
        }

        if !budget.is_exhausted() && !cursor.is_empty() {
            let minutes = budget.consume(budget.remaining());
            cursor.push(
                FLEXIBLE_TASK.to_string(),
                Some(FLEXIBLE_DESCRIPTION.to_string()),
                minutes,
            );
        }

        cursor.into_entries()
    }
}

struct TimelineCursor {
    clock: NaiveTime,
    entries: Vec<TimelineEntry>,
}

impl TimelineCursor {
    fn new(start: NaiveTime) -> Self {
        Self {
            clock: start,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, task: String, description: Option<String>, minutes: u32) {
        let end = schedule_utils::add_minutes(self.clock, minutes);
        self.entries.push(TimelineEntry {
            start_time: schedule_utils::format_clock(self.clock),
            end_time: schedule_utils::format_clock(end),
            task,
            description,
            duration: minutes,
            completed: false,
        });
        self.clock = end;
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn into_entries(self) -> Vec<TimelineEntry> {
        self.entries
    }
}
