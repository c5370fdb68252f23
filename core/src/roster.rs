//! Synthetic upstream responses for demos, load checks and tests.
//!
//! The output has the same shape the scheduling backend sends: one record
//! per assigned person, open slots with no assignee, clock flags that are
//! true, false or missing, and optionally a sprinkling of malformed rows.

use crate::{
    name_generator::NameGenerator,
    record::{Person, RawAssignment, Workgroup},
    remote::FetchResponse,
    rng::{RosterRng, RosterSlot},
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

const SHIFT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone)]
pub struct RosterSpec {
    pub shifts: usize,
    pub people: usize,
    pub workgroups: usize,
    pub max_staff_per_shift: usize,
    /// Keep adding shifts until at least this many records exist, then
    /// truncate to exactly this many.
    pub target_records: Option<usize>,
    pub open_slot_rate: f64,
    pub clocked_in_rate: f64,
    /// Share of clock flags sent as missing rather than `false`.
    pub missing_clock_rate: f64,
    pub invalid_rate: f64,
    pub day: NaiveDate,
}

impl Default for RosterSpec {
    fn default() -> Self {
        Self {
            shifts: 40,
            people: 120,
            workgroups: 4,
            max_staff_per_shift: 5,
            target_records: None,
            open_slot_rate: 0.05,
            clocked_in_rate: 0.6,
            missing_clock_rate: 0.3,
            invalid_rate: 0.0,
            day: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default(),
        }
    }
}

pub struct RosterGenerator {
    spec: RosterSpec,
    people_rng: RosterRng,
    shift_rng: RosterRng,
    staffing_rng: RosterRng,
    dirt_rng: RosterRng,
}

impl RosterGenerator {
    pub fn new(seed: u64, spec: RosterSpec) -> Self {
        Self {
            spec,
            people_rng: RosterRng::new(seed, RosterSlot::People),
            shift_rng: RosterRng::new(seed, RosterSlot::Shifts),
            staffing_rng: RosterRng::new(seed, RosterSlot::Staffing),
            dirt_rng: RosterRng::new(seed, RosterSlot::Dirt),
        }
    }

    pub fn generate(mut self) -> FetchResponse {
        let workgroups = self.workgroups();
        let people = self.people();
        let mut records = Vec::new();

        let mut shift_no = 0usize;
        loop {
            let enough = match self.spec.target_records {
                Some(target) => records.len() >= target,
                None => shift_no >= self.spec.shifts,
            };
            if enough {
                break;
            }
            self.push_shift(shift_no, &workgroups, &people, &mut records);
            shift_no += 1;
        }
        if let Some(target) = self.spec.target_records {
            records.truncate(target);
        }

        FetchResponse {
            records,
            people,
            workgroups,
            has_more: false,
        }
    }

    fn workgroups(&self) -> Vec<Workgroup> {
        (0..self.spec.workgroups.max(1))
            .map(|i| Workgroup {
                id: format!("wg-{i}"),
                name: format!("Workgroup {}", i + 1),
                parent_id: None,
            })
            .collect()
    }

    fn people(&mut self) -> Vec<Person> {
        (0..self.spec.people.max(1))
            .map(|i| {
                let rng = &mut self.people_rng;
                let given = NameGenerator::given_name(rng);
                let family = NameGenerator::family_name(rng);
                // Some upstream profiles carry a display name, most do not.
                let display_name = rng.chance(0.2).then(|| format!("{given} {}.", &family[..1]));
                Person {
                    id: format!("p-{i}"),
                    display_name,
                    given_name: Some(given.to_string()),
                    family_name: Some(family.to_string()),
                    phone: Some(format!("+64 21 {:07}", rng.next_u64_below(10_000_000))),
                }
            })
            .collect()
    }

    fn push_shift(
        &mut self,
        shift_no: usize,
        workgroups: &[Workgroup],
        people: &[Person],
        records: &mut Vec<RawAssignment>,
    ) {
        let rng = &mut self.shift_rng;
        let title = NameGenerator::shift_title(rng);
        let location = NameGenerator::location(rng).to_string();
        let workgroup = &workgroups[rng.pick(workgroups.len())];
        let start_hour = rng.next_u64_below(20) as u32;
        let hours = 4 + rng.next_u64_below(9) as i64;
        let start = NaiveDateTime::new(
            self.spec.day,
            NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap_or_default(),
        );
        let end = start + Duration::hours(hours);
        let staff = 1 + rng.pick(self.spec.max_staff_per_shift.max(1));

        let mut seated: Vec<&str> = Vec::with_capacity(staff);
        for seat in 0..staff {
            let staffing = &mut self.staffing_rng;
            let assignee = if staffing.chance(self.spec.open_slot_rate) {
                None
            } else {
                let person = &people[staffing.pick(people.len())];
                if seated.contains(&person.id.as_str()) {
                    None
                } else {
                    seated.push(&person.id);
                    Some(person.id.clone())
                }
            };
            let clocked_in = match assignee {
                None => None,
                Some(_) if staffing.chance(self.spec.clocked_in_rate) => Some(true),
                Some(_) if staffing.chance(self.spec.missing_clock_rate) => None,
                Some(_) => Some(false),
            };

            let mut record = RawAssignment {
                id: format!("a-{shift_no}-{seat}"),
                name: title.clone(),
                subject: Some(format!("Shift {}", shift_no + 1)),
                location: Some(location.clone()),
                workgroup_id: Some(workgroup.id.clone()),
                start_timestamp: start.format(SHIFT_TIME_FORMAT).to_string(),
                end_timestamp: end.format(SHIFT_TIME_FORMAT).to_string(),
                assigned_person_id: assignee,
                clocked_in,
            };
            if self.dirt_rng.chance(self.spec.invalid_rate) {
                match self.dirt_rng.next_u64_below(4) {
                    0 => record.id.clear(),
                    1 => record.name.clear(),
                    2 => record.start_timestamp.clear(),
                    _ => record.end_timestamp.clear(),
                }
            }
            records.push(record);
        }
    }
}

/// Convenience wrapper: `RosterGenerator::new(seed, spec).generate()`.
pub fn generate_roster(seed: u64, spec: RosterSpec) -> FetchResponse {
    RosterGenerator::new(seed, spec).generate()
}
