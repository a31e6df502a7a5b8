use serde::{Deserialize, Serialize};

use crate::api::error::SystemError;
use crate::constants::MAX_LISTING_IMAGES;
use crate::modules::{
    listing::{
        model::NewListing,
        schema::{Listing, OwnerType, PropertyType, TenantType},
    },
    media::model::PendingFile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftState {
    #[default]
    Empty,
    Editing,
    Saving,
    Saved,
}

/// Editable listing attributes, as a form holds them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingForm {
    pub title: String,
    pub location: String,
    pub price: i64,
    pub property_type: PropertyType,
    pub tenant_type: TenantType,
    pub owner_type: OwnerType,
    pub contact_number: String,
    pub description: String,
}

impl ListingForm {
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            location: listing.location.clone(),
            price: listing.price,
            property_type: listing.property_type,
            tenant_type: listing.tenant_type,
            owner_type: listing.owner_type,
            contact_number: listing.contact_number.clone(),
            description: listing.description.clone().unwrap_or_default(),
        }
    }

    /// Applies one raw input value by field name.
    ///
    /// `price` parses leniently (blank or garbage becomes 0) but never goes
    /// negative. Enum fields accept only their exact literals. On error the
    /// form is unchanged.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), SystemError> {
        match name {
            "title" => self.title = value.to_string(),
            "location" => self.location = value.to_string(),
            "contact_number" => self.contact_number = value.to_string(),
            "description" => self.description = value.to_string(),
            "price" => {
                let price = value.trim().parse::<f64>().ok().filter(|p| p.is_finite()).unwrap_or(0.0);
                if price < 0.0 {
                    return Err(SystemError::bad_request("Price cannot be negative"));
                }
                self.price = price.trunc() as i64;
            }
            "property_type" => self.property_type = value.parse()?,
            "tenant_type" => self.tenant_type = value.parse()?,
            "owner_type" => self.owner_type = value.parse()?,
            other => {
                return Err(SystemError::bad_request(format!("Unknown field '{other}'")));
            }
        }
        Ok(())
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push("title");
        }
        if self.location.is_empty() {
            missing.push("location");
        }
        if self.contact_number.is_empty() {
            missing.push("contact_number");
        }
        missing
    }

    pub fn validate(&self) -> Result<(), SystemError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(SystemError::bad_request(format!(
                "Please fill in all required fields: {}",
                missing.join(", ")
            )));
        }
        if self.price < 0 {
            return Err(SystemError::bad_request("Price cannot be negative"));
        }
        Ok(())
    }

    pub fn to_new_listing(&self, images: Vec<String>) -> NewListing {
        NewListing {
            title: self.title.clone(),
            location: self.location.clone(),
            price: self.price,
            property_type: self.property_type,
            tenant_type: self.tenant_type,
            owner_type: self.owner_type,
            contact_number: self.contact_number.clone(),
            images,
            description: Some(self.description.clone()).filter(|d| !d.is_empty()),
        }
    }
}

/// One edit session's unsaved state.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub form: ListingForm,
    pending_files: Vec<PendingFile>,
    existing_image_urls: Vec<String>,
}

impl Draft {
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            form: ListingForm::from_listing(listing),
            pending_files: Vec::new(),
            existing_image_urls: listing.images.clone(),
        }
    }

    pub fn pending_files(&self) -> &[PendingFile] {
        &self.pending_files
    }

    pub fn existing_image_urls(&self) -> &[String] {
        &self.existing_image_urls
    }

    pub fn total_images(&self) -> usize {
        self.pending_files.len() + self.existing_image_urls.len()
    }

    /// All-or-nothing append.
    pub fn add_files(&mut self, files: Vec<PendingFile>) -> Result<(), SystemError> {
        let attempted = self.total_images() + files.len();
        if attempted > MAX_LISTING_IMAGES {
            return Err(SystemError::TooManyImages { limit: MAX_LISTING_IMAGES, attempted });
        }
        self.pending_files.extend(files);
        Ok(())
    }

    pub fn remove_pending_file(&mut self, index: usize) -> Option<PendingFile> {
        (index < self.pending_files.len()).then(|| self.pending_files.remove(index))
    }

    pub fn remove_existing_image(&mut self, index: usize) -> Option<String> {
        (index < self.existing_image_urls.len()).then(|| self.existing_image_urls.remove(index))
    }

    /// Existing images first, then freshly uploaded ones.
    pub fn merged_images(&self, uploaded: Vec<String>) -> Vec<String> {
        let mut images = Vec::with_capacity(self.existing_image_urls.len() + uploaded.len());
        images.extend(self.existing_image_urls.iter().cloned());
        images.extend(uploaded);
        images
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(name: &str) -> PendingFile {
        PendingFile::new(name, vec![1])
    }

    #[test]
    fn blank_form_defaults() {
        let form = ListingForm::default();
        assert_eq!(form.property_type.as_str(), "1 BHK");
        assert_eq!(form.tenant_type.as_str(), "Bachelor");
        assert_eq!(form.owner_type.as_str(), "Direct Owner");
        assert_eq!(form.price, 0);
        assert_eq!(form.missing_required(), ["title", "location", "contact_number"]);
    }

    #[test]
    fn set_field_parses_price_and_literals() {
        let mut form = ListingForm::default();
        form.set_field("price", "15000.75").unwrap();
        assert_eq!(form.price, 15000);
        form.set_field("price", "abc").unwrap();
        assert_eq!(form.price, 0);
        assert!(form.set_field("price", "-5").is_err());
        assert_eq!(form.price, 0);

        form.set_field("tenant_type", "Working professionals").unwrap();
        assert_eq!(form.tenant_type, TenantType::WorkingProfessionals);
        assert!(form.set_field("owner_type", "Broker").is_err());
        assert_eq!(form.owner_type, OwnerType::DirectOwner);
        assert!(form.set_field("owner_id", "someone").is_err());
    }

    #[test]
    fn empty_description_is_not_stored() {
        let mut form = ListingForm::default();
        assert_eq!(form.to_new_listing(vec![]).description, None);
        form.description = "Near metro".into();
        assert_eq!(form.to_new_listing(vec![]).description.as_deref(), Some("Near metro"));
    }

    #[test]
    fn add_files_is_all_or_nothing() {
        let mut draft = Draft::default();
        draft.add_files((0..8).map(|i| photo(&format!("{i}.jpg"))).collect()).unwrap();

        let err = draft.add_files(vec![photo("a.jpg"), photo("b.jpg"), photo("c.jpg")]).unwrap_err();
        assert!(matches!(err, SystemError::TooManyImages { limit: 10, attempted: 11 }));
        assert_eq!(draft.pending_files().len(), 8);

        draft.add_files(vec![photo("a.jpg"), photo("b.jpg")]).unwrap();
        assert_eq!(draft.total_images(), 10);
        assert!(draft.add_files(vec![photo("c.jpg")]).is_err());
        draft.add_files(Vec::new()).unwrap();
    }

    #[test]
    fn removal_out_of_range_is_a_no_op() {
        let mut draft = Draft::default();
        draft.add_files(vec![photo("a.jpg"), photo("b.jpg")]).unwrap();

        assert!(draft.remove_pending_file(5).is_none());
        assert!(draft.remove_existing_image(0).is_none());
        assert_eq!(draft.remove_pending_file(0).map(|f| f.file_name).as_deref(), Some("a.jpg"));
        assert_eq!(draft.pending_files()[0].file_name, "b.jpg");
    }
}
