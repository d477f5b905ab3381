//! Household daily-task queries and generation.
//!
//! Task generation reads the caregiver profile and rebuilds the day's task
//! list from it: one feeding per configured meal spread across the day's
//! time groups, plus the fixed morning/afternoon/evening entries and a
//! medicine reminder when the profile asks for one.

use chrono::NaiveDate;
use serde_json::Value;

use crate::db::Database;
use crate::error::DbResult;

const TIME_GROUPS: [&str; 4] = ["Morning", "Day", "Afternoon", "Night"];

/// Time group for the n-th feeding of the day; overflow lands on Night.
fn group_for_index(i: usize) -> &'static str {
    TIME_GROUPS.get(i).copied().unwrap_or("Night")
}

/// Meals per day from the profile's free-text meal cycle.
///
/// An absent or empty value defaults to 4. A value with leading digits
/// ("4 repas") uses them; a value with none yields 0 feedings.
fn meals_from(text: Option<&str>) -> u32 {
    match text.map(str::trim) {
        None | Some("") => 4,
        Some(s) => {
            let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        }
    }
}

/// One generated task: label and time group.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedTask {
    task: &'static str,
    group: &'static str,
}

/// Compose the day's task list for a profile.
fn plan_for(meals: u32, taking_medicine: bool) -> Vec<PlannedTask> {
    let mut tasks = vec![PlannedTask {
        task: "Petit déjeuner",
        group: "Morning",
    }];
    for i in 0..meals as usize {
        tasks.push(PlannedTask {
            task: "Faire manger bébé",
            group: group_for_index(i),
        });
    }
    if taking_medicine {
        tasks.push(PlannedTask {
            task: "Prendre les médicaments",
            group: "Day",
        });
    }
    tasks.push(PlannedTask {
        task: "Jouer avec bébé",
        group: "Afternoon",
    });
    tasks.push(PlannedTask {
        task: "Dîner",
        group: "Night",
    });
    tasks.push(PlannedTask {
        task: "Dodo",
        group: "Night",
    });
    tasks
}

/// Tasks for one day, grouped by time group then task label.
pub async fn for_day(db: &Database, day: NaiveDate) -> DbResult<Vec<Value>> {
    let rows = db
        .query(
            "SELECT dt.id AS \"TaskId\", dt.day::text AS \"Day\", dt.task AS \"Task\", \
                    dt.task_is_completed AS \"Task_Is_Completed\", \
                    dt.time_group AS \"Time_Group\" \
             FROM daily_task dt \
             WHERE dt.day = ?::date \
             ORDER BY dt.time_group ASC, dt.task ASC",
            &[day.to_string().into()],
        )
        .await?;
    Ok(rows.into_iter().map(Value::Object).collect())
}

/// Mark a task done or not done; false when the task does not exist.
pub async fn set_completed(db: &Database, id: i64, completed: bool) -> DbResult<bool> {
    let affected = db
        .execute(
            "UPDATE daily_task SET task_is_completed = ? WHERE id = ?",
            &[completed.into(), id.into()],
        )
        .await?;
    Ok(affected > 0)
}

/// Rebuild a day's tasks from the caregiver profile.
///
/// Returns the number of inserted tasks, or `None` when no profile exists
/// for `inviter_id`. The day's previous tasks are replaced.
pub async fn generate(
    db: &Database,
    inviter_id: &str,
    day: NaiveDate,
) -> DbResult<Option<usize>> {
    let rows = db
        .query(
            "SELECT baby_meal_cycle AS meals, is_baby_taking_medicine AS medicine \
             FROM inviter \
             WHERE inviter_id = ?",
            &[inviter_id.into()],
        )
        .await?;
    let Some(profile) = rows.into_iter().next() else {
        return Ok(None);
    };

    let meals = meals_from(profile.get("meals").and_then(Value::as_str));
    let medicine = profile
        .get("medicine")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let plan = plan_for(meals, medicine);

    let day_text = day.to_string();
    db.execute(
        "DELETE FROM daily_task WHERE day = ?::date",
        &[day_text.as_str().into()],
    )
    .await?;

    for task in &plan {
        db.execute(
            "INSERT INTO daily_task (day, task, task_is_completed, time_group) \
             VALUES (?::date, ?, FALSE, ?)",
            &[day_text.as_str().into(), task.task.into(), task.group.into()],
        )
        .await?;
    }

    Ok(Some(plan.len()))
}
