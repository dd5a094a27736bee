use chrono::{NaiveDate, NaiveDateTime};
use org_reports::db::procedure::install_bonus_procedure;
use org_reports::db::{DataSource, Database, Row, Statement};
use org_reports::error::{DataAccessError, ReportError};
use org_reports::models::*;
use org_reports::reports::*;
use rust_decimal::Decimal;
use speculate2::speculate;

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Reference "now" for every report in this file. Six-month cutoff is 2024-12-15 12:00.
fn as_of() -> NaiveDateTime {
    at(2025, 6, 15)
}

fn high_activity(db: &Database) -> Vec<Employee> {
    high_activity_employees(
        db,
        &HighActivityParams {
            as_of: as_of(),
            ..HighActivityParams::default()
        },
    )
    .expect("High-activity report failed")
}

fn listing(db: &Database) -> Vec<EmployeeProjectRow> {
    employee_project_listing(
        db,
        &AssignmentParams {
            as_of: as_of(),
            ..AssignmentParams::default()
        },
    )
    .expect("Listing report failed")
}

fn department(db: &Database, name: &str) -> Department {
    db.create_department(CreateDepartmentInput {
        name: name.to_string(),
    })
    .expect("Failed to create department")
}

fn employee(db: &Database, dept: &Department, name: &str, salary: i64, rating: f64) -> Employee {
    db.create_employee(CreateEmployeeInput {
        name: name.to_string(),
        department_id: dept.id,
        salary: Decimal::from(salary),
        performance_rating: rating,
    })
    .expect("Failed to create employee")
}

fn project(db: &Database, name: &str, deadline: NaiveDateTime, budget: i64) -> Project {
    db.create_project(CreateProjectInput {
        name: name.to_string(),
        deadline,
        budget: Decimal::from(budget),
    })
    .expect("Failed to create project")
}

fn assign_all(db: &Database, employee: &Employee, projects: &[&Project]) {
    for project in projects {
        db.assign(employee.id, project.id)
            .expect("Failed to assign employee");
    }
}

fn names(employees: &[Employee]) -> Vec<&str> {
    employees.iter().map(|e| e.name.as_str()).collect()
}

/// A data source whose store is always down.
struct DownSource;

impl DataSource for DownSource {
    fn query(&self, _: &Statement) -> Result<Vec<Row>, DataAccessError> {
        Err(DataAccessError::Unreachable("connection refused".to_string()))
    }

    fn execute(&self, _: &Statement) -> Result<usize, DataAccessError> {
        Err(DataAccessError::Unreachable("connection refused".to_string()))
    }

    fn object_exists(&self, _: &str) -> Result<bool, DataAccessError> {
        Err(DataAccessError::Unreachable("connection refused".to_string()))
    }
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
        let eng = department(&db, "Eng");
    }

    describe "high_activity_employees" {
        it "includes employees with more than three qualifying assignments" {
            let ann = employee(&db, &eng, "Ann", 1000, 3.0);
            let a = project(&db, "A", at(2025, 1, 10), 100);
            let b = project(&db, "B", at(2025, 3, 1), 100);
            let c = project(&db, "C", at(2025, 6, 1), 100);
            let d = project(&db, "D", at(2025, 9, 30), 100);
            assign_all(&db, &ann, &[&a, &b, &c, &d]);

            let result = high_activity(&db);
            assert_eq!(names(&result), vec!["Ann"]);
            assert_eq!(result[0].salary, Decimal::from(1000));
        }

        it "excludes employees with exactly three" {
            let ann = employee(&db, &eng, "Ann", 1000, 3.0);
            let a = project(&db, "A", at(2025, 1, 10), 100);
            let b = project(&db, "B", at(2025, 3, 1), 100);
            let c = project(&db, "C", at(2025, 6, 1), 100);
            assign_all(&db, &ann, &[&a, &b, &c]);

            assert!(high_activity(&db).is_empty());
        }

        it "ignores assignments with deadlines before the cutoff" {
            let ann = employee(&db, &eng, "Ann", 1000, 3.0);
            let a = project(&db, "A", at(2025, 1, 10), 100);
            let b = project(&db, "B", at(2025, 3, 1), 100);
            let c = project(&db, "C", at(2025, 6, 1), 100);
            let old1 = project(&db, "Old1", at(2024, 1, 1), 100);
            let old2 = project(&db, "Old2", at(2024, 11, 30), 100);
            assign_all(&db, &ann, &[&a, &b, &c, &old1, &old2]);

            assert!(high_activity(&db).is_empty());
        }

        it "counts a deadline exactly at the cutoff" {
            let ann = employee(&db, &eng, "Ann", 1000, 3.0);
            let edge = project(&db, "Edge", at(2024, 12, 15), 100);
            let a = project(&db, "A", at(2025, 1, 10), 100);
            let b = project(&db, "B", at(2025, 3, 1), 100);
            let c = project(&db, "C", at(2025, 6, 1), 100);
            assign_all(&db, &ann, &[&edge, &a, &b, &c]);

            assert_eq!(names(&high_activity(&db)), vec!["Ann"]);
        }

        it "counts future deadlines as inside the window" {
            let ann = employee(&db, &eng, "Ann", 1000, 3.0);
            let future: Vec<Project> = (1..=4)
                .map(|i| project(&db, &format!("F{}", i), at(2026, i, 1), 100))
                .collect();
            assign_all(&db, &ann, &future.iter().collect::<Vec<_>>());

            assert_eq!(names(&high_activity(&db)), vec!["Ann"]);
        }

        it "honors a custom threshold and window" {
            let ann = employee(&db, &eng, "Ann", 1000, 3.0);
            let bob = employee(&db, &eng, "Bob", 1000, 3.0);
            let recent = project(&db, "Recent", at(2025, 6, 1), 100);
            let march = project(&db, "March", at(2025, 3, 1), 100);
            assign_all(&db, &ann, &[&recent, &march]);
            assign_all(&db, &bob, &[&recent]);

            let params = HighActivityParams {
                window: ActivityWindow::months(1),
                threshold: 0,
                as_of: as_of(),
            };
            let result = high_activity_employees(&db, &params).expect("Report failed");
            assert_eq!(names(&result), vec!["Ann", "Bob"]);

            let params = HighActivityParams { threshold: 1, ..params };
            assert!(high_activity_employees(&db, &params).expect("Report failed").is_empty());
        }

        it "orders results by name" {
            let projects: Vec<Project> = (1..=4)
                .map(|i| project(&db, &format!("P{}", i), at(2025, i + 1, 1), 100))
                .collect();
            let refs: Vec<&Project> = projects.iter().collect();
            for name in ["Zed", "Mia", "Abe"] {
                let e = employee(&db, &eng, name, 1000, 3.0);
                assign_all(&db, &e, &refs);
            }

            assert_eq!(names(&high_activity(&db)), vec!["Abe", "Mia", "Zed"]);
        }

        it "is empty when there are no assignments" {
            employee(&db, &eng, "Ann", 1000, 3.0);
            assert!(high_activity(&db).is_empty());
        }
    }

    describe "employee_project_listing" {
        it "returns one row per qualifying assignment" {
            let ann = employee(&db, &eng, "Ann", 1000, 3.0);
            let bob = employee(&db, &eng, "Bob", 1000, 3.0);
            let a = project(&db, "A", at(2025, 2, 1), 100);
            let b = project(&db, "B", at(2025, 4, 1), 100);
            let c = project(&db, "C", at(2025, 8, 1), 100);
            let old = project(&db, "Old", at(2024, 6, 1), 100);
            assign_all(&db, &ann, &[&a, &b, &c, &old]);
            assign_all(&db, &bob, &[&a, &old]);

            let rows = listing(&db);
            assert_eq!(rows.len(), 4);
            assert_eq!(rows.iter().filter(|r| r.employee_name == "Ann").count(), 3);
            assert!(rows.iter().all(|r| r.project_name != "Old"));
        }

        it "orders by employee then deadline" {
            let ann = employee(&db, &eng, "Ann", 1000, 3.0);
            let bob = employee(&db, &eng, "Bob", 1000, 3.0);
            let late = project(&db, "Late", at(2025, 8, 1), 100);
            let early = project(&db, "Early", at(2025, 2, 1), 100);
            assign_all(&db, &bob, &[&early]);
            assign_all(&db, &ann, &[&late, &early]);

            let rows: Vec<(String, String)> = listing(&db)
                .into_iter()
                .map(|r| (r.employee_name, r.project_name))
                .collect();
            assert_eq!(
                rows,
                vec![
                    ("Ann".to_string(), "Early".to_string()),
                    ("Ann".to_string(), "Late".to_string()),
                    ("Bob".to_string(), "Early".to_string()),
                ]
            );
        }

        it "carries the full deadline" {
            let ann = employee(&db, &eng, "Ann", 1000, 3.0);
            let a = project(&db, "A", at(2025, 2, 1), 100);
            assign_all(&db, &ann, &[&a]);

            assert_eq!(listing(&db)[0].project_deadline, at(2025, 2, 1));
        }

        it "excludes employees without assignments" {
            employee(&db, &eng, "Idle", 1000, 3.0);
            assert!(listing(&db).is_empty());
        }
    }

    describe "calculate_bonuses" {
        it "computes salary times rating times five percent exactly" {
            employee(&db, &eng, "Ann", 1000, 4.0);

            let rows = calculate_bonuses(&db).expect("Bonus report failed");
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].salary, Decimal::from(1000));
            assert_eq!(rows[0].performance_rating, 4.0);
            assert_eq!(rows[0].bonus, Decimal::new(20000, 2));
        }

        it "keeps cents exact for fractional salaries" {
            db.create_employee(CreateEmployeeInput {
                name: "Cents".to_string(),
                department_id: eng.id,
                salary: Decimal::new(7_100_050, 2),
                performance_rating: 4.1,
            })
            .expect("Failed to create employee");

            // 71000.50 * 0.205 = 14555.1025
            let rows = calculate_bonuses(&db).expect("Bonus report failed");
            assert_eq!(rows[0].salary, Decimal::new(7_100_050, 2));
            assert_eq!(rows[0].bonus, Decimal::new(1_455_510, 2));
        }

        it "includes every employee, even without assignments" {
            let ann = employee(&db, &eng, "Ann", 1000, 4.0);
            employee(&db, &eng, "Idle", 500, 0.0);
            let a = project(&db, "A", at(2025, 2, 1), 100);
            assign_all(&db, &ann, &[&a]);

            let rows = calculate_bonuses(&db).expect("Bonus report failed");
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[1].name, "Idle");
            assert_eq!(rows[1].bonus, Decimal::ZERO);
        }

        it "installs the routine once" {
            assert!(install_bonus_procedure(&db).expect("Install failed"));
            assert!(!install_bonus_procedure(&db).expect("Install failed"));
            calculate_bonuses(&db).expect("Bonus report failed");

            let rows = db
                .query(&Statement::literal(
                    "SELECT COUNT(*) AS n FROM sqlite_master WHERE name = 'CalculateBonuses'",
                ))
                .expect("Query failed");
            assert_eq!(rows[0].int("n").expect("Missing count"), 1);
        }
    }

    describe "department_rollup" {
        it "yields one row per project with the assigned salaries summed" {
            let a = employee(&db, &eng, "A", 1000, 3.0);
            let b = employee(&db, &eng, "B", 2000, 3.0);
            let x = project(&db, "X", at(2025, 2, 1), 500);
            let y = project(&db, "Y", at(2025, 3, 1), 700);
            assign_all(&db, &a, &[&x, &y]);
            assign_all(&db, &b, &[&x, &y]);

            let rows = department_rollup(&db).expect("Rollup failed");
            assert_eq!(
                rows,
                vec![
                    FinancialReport {
                        department_name: "Eng".to_string(),
                        total_salary: Decimal::from(3000),
                        project_name: "X".to_string(),
                        project_budget: Decimal::from(500),
                    },
                    FinancialReport {
                        department_name: "Eng".to_string(),
                        total_salary: Decimal::from(3000),
                        project_name: "Y".to_string(),
                        project_budget: Decimal::from(700),
                    },
                ]
            );
        }

        it "sums only the employees on each project" {
            let a = employee(&db, &eng, "A", 1000, 3.0);
            let b = employee(&db, &eng, "B", 2000, 3.0);
            let x = project(&db, "X", at(2025, 2, 1), 500);
            let y = project(&db, "Y", at(2025, 3, 1), 700);
            assign_all(&db, &a, &[&x, &y]);
            assign_all(&db, &b, &[&y]);

            let totals: Vec<(String, Decimal)> = department_rollup(&db)
                .expect("Rollup failed")
                .into_iter()
                .map(|r| (r.project_name, r.total_salary))
                .collect();
            assert_eq!(
                totals,
                vec![
                    ("X".to_string(), Decimal::from(1000)),
                    ("Y".to_string(), Decimal::from(3000)),
                ]
            );
        }

        it "splits a shared project across departments" {
            let ops = department(&db, "Ops");
            let a = employee(&db, &eng, "A", 1000, 3.0);
            let o = employee(&db, &ops, "O", 400, 3.0);
            let x = project(&db, "X", at(2025, 2, 1), 500);
            assign_all(&db, &a, &[&x]);
            assign_all(&db, &o, &[&x]);

            let rows = department_rollup(&db).expect("Rollup failed");
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].department_name, "Eng");
            assert_eq!(rows[1].department_name, "Ops");
            assert_eq!(rows[1].total_salary, Decimal::from(400));
        }

        it "omits departments without assignments" {
            employee(&db, &eng, "Idle", 1000, 3.0);
            assert!(department_rollup(&db).expect("Rollup failed").is_empty());
        }

        it "agrees with the entity strategy" {
            let ops = department(&db, "Ops");
            department(&db, "Empty");
            let a = employee(&db, &eng, "A", 1000, 3.0);
            let b = employee(&db, &eng, "B", 2500, 3.0);
            let o = employee(&db, &ops, "O", 400, 3.0);
            let x = project(&db, "X", at(2025, 2, 1), 500);
            let y = project(&db, "Y", at(2023, 3, 1), 700);
            let z = project(&db, "Z", at(2026, 3, 1), 900);
            assign_all(&db, &a, &[&x, &y, &z]);
            assign_all(&db, &b, &[&z]);
            assign_all(&db, &o, &[&x, &z]);

            let literal = department_rollup(&db).expect("Rollup failed");
            let entity = department_rollup_via_entities(&db).expect("Rollup failed");
            assert_eq!(literal.len(), 5);
            assert_eq!(literal, entity);
        }
    }

    describe "compare_rollup_strategies" {
        it "times both strategies and reports consistency" {
            let a = employee(&db, &eng, "A", 1000, 3.0);
            let x = project(&db, "X", at(2025, 2, 1), 500);
            assign_all(&db, &a, &[&x]);

            let comparison = compare_rollup_strategies(&db).expect("Comparison failed");
            assert!(comparison.consistent);
            assert_eq!(comparison.entity.strategy, RollupStrategy::Entity);
            assert_eq!(comparison.literal.strategy, RollupStrategy::Literal);
            assert_eq!(comparison.literal.rows.len(), 1);

            let expected = if comparison.entity.elapsed < comparison.literal.elapsed {
                RollupStrategy::Entity
            } else {
                RollupStrategy::Literal
            };
            assert_eq!(comparison.fastest, expected);
        }
    }

    describe "failures" {
        it "propagates an unreachable store from every report" {
            let params = HighActivityParams { as_of: as_of(), ..HighActivityParams::default() };
            assert!(matches!(
                high_activity_employees(&DownSource, &params),
                Err(DataAccessError::Unreachable(_))
            ));
            assert!(matches!(
                employee_project_listing(&DownSource, &AssignmentParams::default()),
                Err(DataAccessError::Unreachable(_))
            ));
            assert!(matches!(
                compare_rollup_strategies(&DownSource),
                Err(DataAccessError::Unreachable(_))
            ));
        }

        it "reports a failed routine install distinctly" {
            match calculate_bonuses(&DownSource) {
                Err(ReportError::ProcedureInstall(e)) => assert_eq!(e.name, "CalculateBonuses"),
                other => panic!("expected install failure, got {:?}", other),
            }
        }

        it "reports a missing schema as a malformed statement" {
            let bare = Database::open_memory().expect("Failed to create in-memory database");
            assert!(matches!(
                department_rollup(&bare),
                Err(DataAccessError::MalformedStatement(_))
            ));
        }
    }
}
