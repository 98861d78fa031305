//! Students command: list and add student records.

use std::fmt::Write;

use ac_core::{CurriculumPolicy, Student};
use ac_db::Store;
use anyhow::{Context, Result, bail};

/// Formats the student roster for human-readable output.
pub fn format_students(students: &[Student]) -> String {
    let mut output = String::new();

    if students.is_empty() {
        writeln!(output, "No students registered.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<4}  {:<28}  {:<12}  {:<6}  Email",
        "ID", "Name", "Registration", "Policy"
    )
    .unwrap();
    for student in students {
        writeln!(
            output,
            "{:<4}  {:<28}  {:<12}  {:<6}  {}",
            student.id, student.name, student.registration, student.policy, student.email
        )
        .unwrap();
    }

    output
}

/// Lists registered students.
pub fn list(store: &Store, json: bool) -> Result<()> {
    let students = store.load_students().context("failed to load students")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&students)?);
    } else {
        print!("{}", format_students(&students));
    }
    Ok(())
}

/// Adds a student. Registration numbers must be unique.
pub fn add(
    store: &Store,
    name: String,
    registration: String,
    email: String,
    policy: CurriculumPolicy,
) -> Result<()> {
    if name.is_empty() || registration.is_empty() {
        bail!("student name and registration cannot be empty");
    }

    let inserted = store
        .add_student(Student {
            id: 0,
            name,
            registration: registration.clone(),
            email,
            policy,
        })
        .context("failed to store student")?;

    if inserted {
        println!("Added student {registration}");
    } else {
        bail!("a student with registration '{registration}' already exists");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_list() {
        let store = Store::open_in_memory().unwrap();
        add(
            &store,
            "Ana".to_string(),
            "2021001".to_string(),
            "ana@ufx.br".to_string(),
            CurriculumPolicy::New,
        )
        .unwrap();

        let students = store.load_students().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].registration, "2021001");

        let output = format_students(&students);
        assert!(output.contains("Ana"));
        assert!(output.contains("2021001"));
    }

    #[test]
    fn add_duplicate_registration_fails() {
        let store = Store::open_in_memory().unwrap();
        let add_ana = || {
            add(
                &store,
                "Ana".to_string(),
                "2021001".to_string(),
                String::new(),
                CurriculumPolicy::New,
            )
        };
        add_ana().unwrap();
        assert!(add_ana().is_err());
    }

    #[test]
    fn format_students_empty() {
        assert!(format_students(&[]).contains("No students registered"));
    }
}
