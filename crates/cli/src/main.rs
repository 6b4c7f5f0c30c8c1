//! carelog command-line driver.
//!
//! A thin stand-in for a UI layer: every command loads the roster file,
//! applies one core operation, and writes the roster back on success. All
//! string parsing (dates, enum tokens, record numbers) happens here; the
//! core only ever sees typed values. Business rejections are printed and
//! leave the file untouched.

use std::error::Error;
use std::path::{Path, PathBuf};

use carelog_core::{
    BloodType, Dosage, Medication, Patient, PatientStore,
};
use carelog_types::NonEmptyText;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use records::Roster;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "carelog")]
#[command(about = "carelog patient record keeper CLI")]
struct Cli {
    /// Roster file holding the patient records
    #[arg(long, default_value = "roster.yaml")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Show a patient's full record
    Show {
        /// Medical record number
        mrn: String,
    },
    /// Register a new patient
    Add {
        /// First name
        first_name: String,
        /// Last name
        last_name: String,
        /// Date of birth (YYYY-MM-DD)
        date_of_birth: String,
        /// Height in millimetres
        height_mm: u32,
        /// Weight in grams
        weight_g: u32,
        /// Blood type, if known (A+, A-, B+, B-, O+, O-, AB+, AB-)
        #[arg(long)]
        blood_type: Option<String>,
    },
    /// Prescribe a medication to a patient
    Prescribe {
        /// Medical record number
        mrn: String,
        /// Medication name
        name: String,
        /// Dosage amount
        value: u32,
        /// Dosage unit (g, mg, mcg)
        unit: String,
        /// Route (oral, subcutaneous, intramuscular, intravenous, inhaled, topical)
        route: String,
        /// Times per day
        frequency: u32,
        /// Duration in days
        duration: u32,
    },
    /// Remove a medication from a patient's history
    RemoveMedication {
        /// Medical record number
        mrn: String,
        /// Medication identifier
        medication_id: String,
    },
    /// List the donor blood types a patient can receive from
    Donors {
        /// Medical record number
        mrn: String,
    },
    /// Check whether a recipient can receive blood from a donor
    CanReceive {
        /// Recipient's medical record number
        recipient_mrn: String,
        /// Donor's medical record number
        donor_mrn: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let now = Utc::now();
    let mut store = load_roster(&cli.file)?;

    match cli.command {
        Commands::List => {
            if store.is_empty() {
                println!("No patients found.");
            } else {
                let mut lines: Vec<String> = store
                    .all()
                    .map(|p| {
                        format!(
                            "MRN: {}  {}",
                            p.medical_record_number().simple(),
                            p.full_name_and_age(now)
                        )
                    })
                    .collect();
                lines.sort();
                for line in lines {
                    println!("{line}");
                }
            }
        }
        Commands::Show { mrn } => {
            let mrn = parse_mrn(&mrn)?;
            match store.get(mrn) {
                Some(patient) => println!("{}", patient.describe(now)),
                None => eprintln!("No patient with MRN {}", mrn.simple()),
            }
        }
        Commands::Add {
            first_name,
            last_name,
            date_of_birth,
            height_mm,
            weight_g,
            blood_type,
        } => {
            let date_of_birth = parse_birth_date(&date_of_birth)?;
            let blood_type = match blood_type {
                Some(notation) => Some(notation.parse::<BloodType>()?),
                None => None,
            };
            match Patient::new(
                NonEmptyText::new(&first_name)?,
                NonEmptyText::new(&last_name)?,
                date_of_birth,
                height_mm,
                weight_g,
                blood_type,
                now,
            ) {
                Ok(patient) => {
                    println!(
                        "Registered patient with MRN: {}",
                        patient.medical_record_number().simple()
                    );
                    store.add(patient);
                    save_roster(&cli.file, &store)?;
                }
                Err(e) => eprintln!("Error registering patient: {e}"),
            }
        }
        Commands::Prescribe {
            mrn,
            name,
            value,
            unit,
            route,
            frequency,
            duration,
        } => {
            let mrn = parse_mrn(&mrn)?;
            let medication = Medication::new(
                NonEmptyText::new(&name)?,
                Dosage::new(value, unit.parse()?),
                route.parse()?,
                frequency,
                duration,
                now,
            );
            let description = medication.to_string();
            match store.get_mut(mrn) {
                Some(patient) => match patient.prescribe(medication, now) {
                    Ok(()) => {
                        println!("Prescribed: {description}");
                        save_roster(&cli.file, &store)?;
                    }
                    Err(e) => eprintln!("Error prescribing medication: {e}"),
                },
                None => eprintln!("No patient with MRN {}", mrn.simple()),
            }
        }
        Commands::RemoveMedication { mrn, medication_id } => {
            let mrn = parse_mrn(&mrn)?;
            let medication_id = Uuid::try_parse(&medication_id)?;
            match store.get_mut(mrn) {
                Some(patient) => {
                    let known = patient.medications().iter().any(|m| m.id() == medication_id);
                    patient.remove_medication(medication_id);
                    if known {
                        println!("Removed medication {}", medication_id.simple());
                        save_roster(&cli.file, &store)?;
                    } else {
                        println!("No medication with id {}", medication_id.simple());
                    }
                }
                None => eprintln!("No patient with MRN {}", mrn.simple()),
            }
        }
        Commands::Donors { mrn } => {
            let mrn = parse_mrn(&mrn)?;
            match store.get(mrn) {
                Some(patient) => {
                    let donors = patient.compatible_donor_types();
                    if donors.is_empty() {
                        println!("Blood type unknown; no compatible donors can be listed.");
                    } else {
                        let notations: Vec<&str> =
                            donors.iter().map(|bt| bt.as_str()).collect();
                        println!("Compatible donors: {}", notations.join(", "));
                    }
                }
                None => eprintln!("No patient with MRN {}", mrn.simple()),
            }
        }
        Commands::CanReceive {
            recipient_mrn,
            donor_mrn,
        } => {
            let recipient_mrn = parse_mrn(&recipient_mrn)?;
            let donor_mrn = parse_mrn(&donor_mrn)?;
            let recipient = match store.get(recipient_mrn) {
                Some(patient) => patient,
                None => {
                    eprintln!("No patient with MRN {}", recipient_mrn.simple());
                    return Ok(());
                }
            };
            let donor = match store.get(donor_mrn) {
                Some(patient) => patient,
                None => {
                    eprintln!("No patient with MRN {}", donor_mrn.simple());
                    return Ok(());
                }
            };
            match recipient.can_receive_blood(donor) {
                Ok(true) => println!(
                    "Yes: {} can receive blood from {}",
                    recipient.full_name_and_age(now),
                    donor.full_name_and_age(now)
                ),
                Ok(false) => println!(
                    "No: {} cannot receive blood from {}",
                    recipient.full_name_and_age(now),
                    donor.full_name_and_age(now)
                ),
                Err(e) => eprintln!("Error checking compatibility: {e}"),
            }
        }
    }

    Ok(())
}

/// Load the roster file, or start an empty store if it does not exist yet.
fn load_roster(path: &Path) -> Result<PatientStore, Box<dyn Error>> {
    if !path.exists() {
        return Ok(PatientStore::new());
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(Roster::parse(&contents)?)
}

/// Write the roster file.
fn save_roster(path: &Path, store: &PatientStore) -> Result<(), Box<dyn Error>> {
    std::fs::write(path, Roster::render(store)?)?;
    tracing::debug!("saved roster to {}", path.display());
    Ok(())
}

fn parse_mrn(input: &str) -> Result<Uuid, Box<dyn Error>> {
    Ok(Uuid::try_parse(input)?)
}

/// Parse a `YYYY-MM-DD` date of birth as midnight UTC.
fn parse_birth_date(input: &str) -> Result<DateTime<Utc>, Box<dyn Error>> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}
