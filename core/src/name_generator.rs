//! Deterministic person names from curated lists.

use crate::rng::RosterRng;

pub struct NameGenerator;

impl NameGenerator {
    pub fn given_name(rng: &mut RosterRng) -> &'static str {
        let names = Self::given_names();
        names[rng.pick(names.len())]
    }

    pub fn family_name(rng: &mut RosterRng) -> &'static str {
        let names = Self::family_names();
        names[rng.pick(names.len())]
    }

    /// A shift title such as "Security - Gate".
    pub fn shift_title(rng: &mut RosterRng) -> String {
        let roles = Self::roles();
        let posts = Self::posts();
        format!("{} - {}", roles[rng.pick(roles.len())], posts[rng.pick(posts.len())])
    }

    pub fn location(rng: &mut RosterRng) -> &'static str {
        let sites = Self::sites();
        sites[rng.pick(sites.len())]
    }

    fn given_names() -> &'static [&'static str] {
        &[
            "James", "Mary", "Robert", "Patricia", "Michael", "Jennifer", "William",
            "Linda", "David", "Elizabeth", "Joseph", "Susan", "Thomas", "Jessica",
            "Daniel", "Sarah", "Matthew", "Karen", "Anthony", "Nancy", "Andrew",
            "Ashley", "Joshua", "Emily", "Kevin", "Amanda", "Brian", "Melissa",
            "Noah", "Olivia", "Ethan", "Sophia", "Mason", "Grace", "Logan", "Mia",
            "Aroha", "Tane", "Priya", "Wei", "Kenji", "Amara", "Luis", "Ingrid",
        ]
    }

    fn family_names() -> &'static [&'static str] {
        &[
            "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller",
            "Davis", "Rodriguez", "Martinez", "Wilson", "Anderson", "Taylor", "Moore",
            "Jackson", "Martin", "Lee", "Thompson", "White", "Harris", "Clark",
            "Lewis", "Walker", "Young", "King", "Wright", "Nguyen", "Patel", "Chen",
            "Kim", "Ngata", "Tran", "Singh", "Okafor", "Silva", "Schmidt", "Rossi",
        ]
    }

    fn roles() -> &'static [&'static str] {
        &[
            "Security", "Cleaning", "Reception", "First Aid", "Traffic Control",
            "Catering", "Maintenance", "Ushering",
        ]
    }

    fn posts() -> &'static [&'static str] {
        &[
            "Gate", "Lobby", "Car Park", "Level 1", "Level 2", "Loading Dock",
            "Main Stage", "Roving",
        ]
    }

    fn sites() -> &'static [&'static str] {
        &[
            "North Campus", "South Campus", "Harbour Site", "Civic Centre",
            "Stadium", "Depot",
        ]
    }
}
