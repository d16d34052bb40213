use super::blood_group::BloodGroup;
use super::views::{BloodRequestView, DonorView, HospitalView, Urgency};

fn matches_search(query: Option<&str>, fields: &[&str]) -> bool {
    match query.map(str::trim) {
        None | Some("") => true,
        Some(query) => {
            let query = query.to_lowercase();
            fields.iter().any(|f| f.to_lowercase().contains(&query))
        }
    }
}

fn matches_exact(wanted: Option<&str>, actual: &str) -> bool {
    wanted.map_or(true, |w| w == actual)
}

/// Client-side filter over the request list; every criterion is optional
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub search: Option<String>,
    pub urgency: Option<Urgency>,
    pub blood_type: Option<String>,
    pub wilaya: Option<String>,
    /// Keep only requests whose group this recipient group accepts
    pub compatible_with: Option<BloodGroup>,
}

impl RequestFilter {
    pub fn matches(&self, request: &BloodRequestView) -> bool {
        matches_search(
            self.search.as_deref(),
            &[request.hospital_name.as_str(), request.location.as_str()],
        ) && self.urgency.map_or(true, |u| u == request.urgency)
            && matches_exact(self.blood_type.as_deref(), &request.blood_type)
            && matches_exact(self.wilaya.as_deref(), &request.location)
            && self.compatible_with.map_or(true, |group| {
                BloodGroup::from_label(&request.blood_type)
                    .is_some_and(|needed| group.can_receive_from(needed))
            })
    }

    pub fn apply(&self, requests: Vec<BloodRequestView>) -> Vec<BloodRequestView> {
        requests.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DonorFilter {
    pub search: Option<String>,
    pub blood_type: Option<String>,
    pub wilaya: Option<String>,
}

impl DonorFilter {
    pub fn matches(&self, donor: &DonorView) -> bool {
        matches_search(self.search.as_deref(), &[donor.name.as_str(), donor.wilaya.as_str()])
            && matches_exact(self.blood_type.as_deref(), &donor.blood_type)
            && matches_exact(self.wilaya.as_deref(), &donor.wilaya)
    }

    pub fn apply(&self, donors: Vec<DonorView>) -> Vec<DonorView> {
        donors.into_iter().filter(|d| self.matches(d)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HospitalFilter {
    pub search: Option<String>,
    pub wilaya: Option<String>,
}

impl HospitalFilter {
    pub fn matches(&self, hospital: &HospitalView) -> bool {
        matches_search(self.search.as_deref(), &[hospital.name.as_str(), hospital.address.as_str()])
            && matches_exact(self.wilaya.as_deref(), &hospital.wilaya)
    }

    pub fn apply(&self, hospitals: Vec<HospitalView>) -> Vec<HospitalView> {
        hospitals.into_iter().filter(|h| self.matches(h)).collect()
    }
}
