//! Seller onboarding wizard: step definitions, step payloads, validators
//! and the session state machine.
//!
//! The wizard walks a seller through six steps in a fixed order. Each step
//! owns a typed payload and a pure validator over it. Navigation forward
//! and completion are gated on the current step's validator; everything
//! the form shell renders (progress, completion flags, field errors) is
//! derived on demand from the session rather than stored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{self, ProducerCategory, ShippingMethod};
use crate::error::CoreError;
use crate::uploads::{self, FileCandidate, UploadOutcome, UploadPolicy, UploadStatus, UploadedFile};
use crate::validation::{self, FieldErrors};

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Location,
    Story,
    Visual,
    Capacity,
    Documents,
    Payments,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: usize = 6;

impl StepId {
    /// Steps in wizard order.
    pub const ALL: [StepId; TOTAL_STEPS] = [
        Self::Location,
        Self::Story,
        Self::Visual,
        Self::Capacity,
        Self::Documents,
        Self::Payments,
    ];

    /// Zero-based position in the wizard.
    pub fn index(self) -> usize {
        match self {
            Self::Location => 0,
            Self::Story => 1,
            Self::Visual => 2,
            Self::Capacity => 3,
            Self::Documents => 4,
            Self::Payments => 5,
        }
    }

    pub fn from_index(index: usize) -> Result<Self, CoreError> {
        Self::ALL.get(index).copied().ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid step index {index}. Must be between 0 and {}",
                TOTAL_STEPS - 1
            ))
        })
    }

    pub fn is_first(self) -> bool {
        self.index() == 0
    }

    pub fn is_last(self) -> bool {
        self.index() == TOTAL_STEPS - 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Location => "Ubicación",
            Self::Story => "Tu historia",
            Self::Visual => "Identidad visual",
            Self::Capacity => "Capacidad y envíos",
            Self::Documents => "Documentación",
            Self::Payments => "Cobros",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Location => "Dónde produces y qué categorías vendes",
            Self::Story => "Cuenta quién hay detrás de tus productos",
            Self::Visual => "Logo, portada e imágenes de producto",
            Self::Capacity => "Volumen de producción y métodos de envío",
            Self::Documents => "Documentos legales y sanitarios",
            Self::Payments => "Conecta tu cuenta para recibir pagos",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Location => "map-pin",
            Self::Story => "book-open",
            Self::Visual => "camera",
            Self::Capacity => "truck",
            Self::Documents => "file-text",
            Self::Payments => "credit-card",
        }
    }

    /// Field errors of this step's payload in `data`.
    pub fn field_errors(self, data: &OnboardingData) -> FieldErrors {
        match self {
            Self::Location => data.location.field_errors(),
            Self::Story => data.story.field_errors(),
            Self::Visual => data.visual.field_errors(),
            Self::Capacity => data.capacity.field_errors(),
            Self::Documents => data.documents.field_errors(),
            Self::Payments => data.payments.field_errors(),
        }
    }

    /// Whether this step's payload in `data` satisfies its validator.
    pub fn is_complete(self, data: &OnboardingData) -> bool {
        self.field_errors(data).is_empty()
    }
}

// ---------------------------------------------------------------------------
// Step validators
// ---------------------------------------------------------------------------

/// A step payload with a completion rule.
///
/// Implementations are pure: they never mutate the payload and return the
/// same answer for the same input.
pub trait StepValidator {
    fn field_errors(&self) -> FieldErrors;

    fn is_complete(&self) -> bool {
        self.field_errors().is_empty()
    }
}

pub const STORY_DESCRIPTION_MIN: usize = 50;
pub const PREPARATION_DAYS_MIN: u8 = 1;
pub const PREPARATION_DAYS_MAX: u8 = 30;

pub fn is_valid_postal_code(value: &str) -> bool {
    value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit())
}

fn reject_rejected_files<'a>(
    errors: &mut FieldErrors,
    field: &str,
    files: impl IntoIterator<Item = &'a UploadedFile>,
) {
    if files
        .into_iter()
        .any(|f| f.status == UploadStatus::Rejected)
    {
        errors.add(field, "Replace the rejected file");
    }
}

// -- Location --

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationPayload {
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub categories: Vec<ProducerCategory>,
    pub images: Vec<UploadedFile>,
}

impl StepValidator for LocationPayload {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        validation::require_text(&mut errors, "address", &self.address);
        validation::require_text(&mut errors, "city", &self.city);
        validation::require_text(&mut errors, "province", &self.province);
        if self.postal_code.trim().is_empty() {
            errors.add("postalCode", "This field is required");
        } else if !is_valid_postal_code(self.postal_code.trim()) {
            errors.add("postalCode", "Postal code must be exactly 5 digits");
        }
        validation::require_selection(&mut errors, "categories", &self.categories);
        errors
    }
}

// -- Story --

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryPayload {
    pub business_name: String,
    pub tagline: String,
    pub description: String,
    pub team_size: String,
    pub values: Vec<String>,
    pub mission: String,
    pub vision: String,
    pub photos: Vec<UploadedFile>,
}

impl StepValidator for StoryPayload {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        validation::require_text(&mut errors, "businessName", &self.business_name);
        validation::require_min_length(
            &mut errors,
            "description",
            &self.description,
            STORY_DESCRIPTION_MIN,
        );
        validation::require_text(&mut errors, "teamSize", &self.team_size);
        validation::require_selection(&mut errors, "values", &self.values);
        if let Some(unknown) = self.values.iter().find(|v| !catalog::is_known_value_tag(v)) {
            errors.add("values", format!("Unknown value tag '{unknown}'"));
        }
        errors
    }
}

// -- Visual --

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualPayload {
    pub logo: Option<UploadedFile>,
    pub cover_image: Option<UploadedFile>,
    pub product_images: Vec<UploadedFile>,
}

impl StepValidator for VisualPayload {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.logo.is_none() {
            errors.add("logo", "Upload your logo");
        }
        if self.product_images.is_empty() {
            errors.add("productImages", "Upload at least one product image");
        }
        reject_rejected_files(&mut errors, "logo", &self.logo);
        reject_rejected_files(&mut errors, "coverImage", &self.cover_image);
        reject_rejected_files(&mut errors, "productImages", &self.product_images);
        errors
    }
}

// -- Capacity --

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacityPayload {
    /// Free-text volume, e.g. "200 kg/semana".
    pub production_volume: String,
    pub shipping_methods: Vec<ShippingMethod>,
    /// Province slugs the producer delivers to. Empty means nationwide.
    pub delivery_zones: Vec<String>,
    pub preparation_days: u8,
}

impl StepValidator for CapacityPayload {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        validation::require_text(&mut errors, "productionVolume", &self.production_volume);
        validation::require_selection(&mut errors, "shippingMethods", &self.shipping_methods);
        if let Some(unknown) = self
            .delivery_zones
            .iter()
            .find(|z| !catalog::is_known_province(z))
        {
            errors.add("deliveryZones", format!("Unknown province '{unknown}'"));
        }
        if !(PREPARATION_DAYS_MIN..=PREPARATION_DAYS_MAX).contains(&self.preparation_days) {
            errors.add(
                "preparationDays",
                format!(
                    "Preparation time must be between {PREPARATION_DAYS_MIN} and \
                     {PREPARATION_DAYS_MAX} days"
                ),
            );
        }
        errors
    }
}

// -- Documents --

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentsPayload {
    /// DNI / NIE / CIF of the business holder.
    pub identity_document: Option<UploadedFile>,
    /// Sanitary registration (RGSEAA or regional equivalent).
    pub sanitary_registration: Option<UploadedFile>,
    pub insurance_certificate: Option<UploadedFile>,
}

impl StepValidator for DocumentsPayload {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.identity_document.is_none() {
            errors.add("identityDocument", "Upload your identity document");
        }
        if self.sanitary_registration.is_none() {
            errors.add("sanitaryRegistration", "Upload your sanitary registration");
        }
        reject_rejected_files(&mut errors, "identityDocument", &self.identity_document);
        reject_rejected_files(&mut errors, "sanitaryRegistration", &self.sanitary_registration);
        reject_rejected_files(&mut errors, "insuranceCertificate", &self.insurance_certificate);
        errors
    }
}

// -- Payments --

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentsPayload {
    pub stripe_connected: bool,
    pub stripe_account_id: Option<String>,
    pub accept_terms: bool,
}

impl StepValidator for PaymentsPayload {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !self.stripe_connected {
            errors.add("stripeConnected", "Connect your payments account");
        }
        validation::require_accepted(&mut errors, "acceptTerms", self.accept_terms);
        errors
    }
}

// ---------------------------------------------------------------------------
// Session data
// ---------------------------------------------------------------------------

/// Accumulated payloads for every step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingData {
    pub location: LocationPayload,
    pub story: StoryPayload,
    pub visual: VisualPayload,
    pub capacity: CapacityPayload,
    pub documents: DocumentsPayload,
    pub payments: PaymentsPayload,
}

/// A payload for one step, as sent by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "data", rename_all = "snake_case")]
pub enum StepPayload {
    Location(LocationPayload),
    Story(StoryPayload),
    Visual(VisualPayload),
    Capacity(CapacityPayload),
    Documents(DocumentsPayload),
    Payments(PaymentsPayload),
}

impl StepPayload {
    pub fn step(&self) -> StepId {
        match self {
            Self::Location(_) => StepId::Location,
            Self::Story(_) => StepId::Story,
            Self::Visual(_) => StepId::Visual,
            Self::Capacity(_) => StepId::Capacity,
            Self::Documents(_) => StepId::Documents,
            Self::Payments(_) => StepId::Payments,
        }
    }
}

impl OnboardingData {
    /// Replace one step's payload. File fields keep their current value:
    /// they change only through the upload operations. The payment account
    /// link is owned by the server and only changes through
    /// [`OnboardingSession::link_payment_account`].
    fn apply(&mut self, payload: StepPayload) {
        match payload {
            StepPayload::Location(mut p) => {
                p.images = std::mem::take(&mut self.location.images);
                self.location = p;
            }
            StepPayload::Story(mut p) => {
                p.photos = std::mem::take(&mut self.story.photos);
                self.story = p;
            }
            // Every visual and document field is a file field.
            StepPayload::Visual(_) | StepPayload::Documents(_) => {}
            StepPayload::Capacity(p) => self.capacity = p,
            StepPayload::Payments(p) => self.payments.accept_terms = p.accept_terms,
        }
    }

    /// Run `f` over the file collection behind `slot`.
    ///
    /// Single-file slots are presented as a collection of at most one file.
    fn with_slot<R>(&mut self, slot: FileSlot, f: impl FnOnce(&mut Vec<UploadedFile>) -> R) -> R {
        let single = match slot {
            FileSlot::LocationImages => return f(&mut self.location.images),
            FileSlot::StoryPhotos => return f(&mut self.story.photos),
            FileSlot::ProductImages => return f(&mut self.visual.product_images),
            FileSlot::Logo => &mut self.visual.logo,
            FileSlot::CoverImage => &mut self.visual.cover_image,
            FileSlot::IdentityDocument => &mut self.documents.identity_document,
            FileSlot::SanitaryRegistration => &mut self.documents.sanitary_registration,
            FileSlot::InsuranceCertificate => &mut self.documents.insurance_certificate,
        };
        let mut files: Vec<UploadedFile> = single.take().into_iter().collect();
        let result = f(&mut files);
        *single = files.pop();
        result
    }

    fn all_files_mut(&mut self) -> Vec<&mut UploadedFile> {
        let mut files: Vec<&mut UploadedFile> = Vec::new();
        files.extend(&mut self.location.images);
        files.extend(&mut self.story.photos);
        files.extend(&mut self.visual.logo);
        files.extend(&mut self.visual.cover_image);
        files.extend(&mut self.visual.product_images);
        files.extend(&mut self.documents.identity_document);
        files.extend(&mut self.documents.sanitary_registration);
        files.extend(&mut self.documents.insurance_certificate);
        files
    }

    /// Every uploaded file across all steps.
    pub fn all_files(&self) -> Vec<&UploadedFile> {
        let mut files: Vec<&UploadedFile> = Vec::new();
        files.extend(&self.location.images);
        files.extend(&self.story.photos);
        files.extend(&self.visual.logo);
        files.extend(&self.visual.cover_image);
        files.extend(&self.visual.product_images);
        files.extend(&self.documents.identity_document);
        files.extend(&self.documents.sanitary_registration);
        files.extend(&self.documents.insurance_certificate);
        files
    }
}

// ---------------------------------------------------------------------------
// File slots
// ---------------------------------------------------------------------------

/// A file field in one of the wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileSlot {
    LocationImages,
    StoryPhotos,
    Logo,
    CoverImage,
    ProductImages,
    IdentityDocument,
    SanitaryRegistration,
    InsuranceCertificate,
}

pub const IMAGE_MAX_SIZE_MB: u64 = 5;
pub const DOCUMENT_MAX_SIZE_MB: u64 = 10;

impl FileSlot {
    pub fn step(self) -> StepId {
        match self {
            Self::LocationImages => StepId::Location,
            Self::StoryPhotos => StepId::Story,
            Self::Logo | Self::CoverImage | Self::ProductImages => StepId::Visual,
            Self::IdentityDocument | Self::SanitaryRegistration | Self::InsuranceCertificate => {
                StepId::Documents
            }
        }
    }

    pub fn policy(self) -> UploadPolicy {
        let images = |multiple| UploadPolicy {
            max_size_mb: IMAGE_MAX_SIZE_MB,
            accept: vec!["image/jpeg".into(), "image/png".into(), "image/webp".into()],
            multiple,
        };
        let document = UploadPolicy {
            max_size_mb: DOCUMENT_MAX_SIZE_MB,
            accept: vec!["application/pdf".into(), "image/jpeg".into(), "image/png".into()],
            multiple: false,
        };
        match self {
            Self::LocationImages | Self::StoryPhotos | Self::ProductImages => images(true),
            Self::Logo | Self::CoverImage => images(false),
            Self::IdentityDocument | Self::SanitaryRegistration | Self::InsuranceCertificate => {
                document
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Session status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl OnboardingStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(CoreError::Validation(format!(
                "Invalid onboarding status '{s}'. Must be one of: in_progress, completed, abandoned"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

// ---------------------------------------------------------------------------
// Session state machine
// ---------------------------------------------------------------------------

/// One seller's pass through the wizard.
///
/// `submitting` is transient: it is set between [`begin_submit`] and
/// [`finish_submit`] and never survives a reload.
///
/// [`begin_submit`]: OnboardingSession::begin_submit
/// [`finish_submit`]: OnboardingSession::finish_submit
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingSession {
    current_step: StepId,
    data: OnboardingData,
    status: OnboardingStatus,
    submitting: bool,
    last_error: Option<String>,
}

impl Default for OnboardingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingSession {
    /// A fresh session on the first step with empty payloads.
    pub fn new() -> Self {
        Self {
            current_step: StepId::Location,
            data: OnboardingData::default(),
            status: OnboardingStatus::InProgress,
            submitting: false,
            last_error: None,
        }
    }

    /// A fresh session on the first step that starts from the payloads of
    /// an earlier session, e.g. after verification sent the seller back.
    pub fn resume_from(data: OnboardingData) -> Self {
        Self {
            data,
            ..Self::new()
        }
    }

    /// Rebuild a session from persisted parts.
    pub fn restore(
        current_step_index: usize,
        data: OnboardingData,
        status: OnboardingStatus,
        last_error: Option<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            current_step: StepId::from_index(current_step_index)?,
            data,
            status,
            submitting: false,
            last_error,
        })
    }

    pub fn current_step(&self) -> StepId {
        self.current_step
    }

    pub fn data(&self) -> &OnboardingData {
        &self.data
    }

    pub fn status(&self) -> OnboardingStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // -- derived selectors --

    pub fn current_field_errors(&self) -> FieldErrors {
        self.current_step.field_errors(&self.data)
    }

    pub fn is_current_step_valid(&self) -> bool {
        self.current_step.is_complete(&self.data)
    }

    fn is_editable(&self) -> bool {
        self.status == OnboardingStatus::InProgress && !self.submitting
    }

    pub fn can_go_back(&self) -> bool {
        self.is_editable() && !self.current_step.is_first()
    }

    pub fn can_go_next(&self) -> bool {
        self.is_editable() && !self.current_step.is_last() && self.is_current_step_valid()
    }

    pub fn can_complete(&self) -> bool {
        self.is_editable() && self.current_step.is_last() && self.is_current_step_valid()
    }

    /// `(index + 1) / N * 100`.
    pub fn progress_percent(&self) -> f64 {
        (self.current_step.index() + 1) as f64 / TOTAL_STEPS as f64 * 100.0
    }

    /// Steps whose payload currently satisfies its validator.
    pub fn completed_steps(&self) -> Vec<StepId> {
        StepId::ALL
            .into_iter()
            .filter(|step| step.is_complete(&self.data))
            .collect()
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            status: self.status,
            current_step: self.current_step,
            current_step_index: self.current_step.index(),
            total_steps: TOTAL_STEPS,
            progress_percent: self.progress_percent(),
            is_valid: self.is_current_step_valid(),
            can_go_back: self.can_go_back(),
            can_go_next: self.can_go_next(),
            can_complete: self.can_complete(),
            submitting: self.submitting,
            last_error: self.last_error.clone(),
            field_errors: self.current_field_errors(),
            steps: StepId::ALL
                .into_iter()
                .map(|step| StepSummary {
                    id: step,
                    index: step.index(),
                    title: step.title(),
                    description: step.description(),
                    icon: step.icon(),
                    complete: step.is_complete(&self.data),
                    current: step == self.current_step,
                })
                .collect(),
            data: self.data.clone(),
        }
    }

    // -- transitions --

    fn ensure_editable(&self, action: &str) -> Result<(), CoreError> {
        if self.status != OnboardingStatus::InProgress {
            return Err(CoreError::Validation(format!(
                "Cannot {action} a session that is {}",
                self.status.as_str()
            )));
        }
        if self.submitting {
            return Err(CoreError::Conflict(format!(
                "Cannot {action} while the session is being submitted"
            )));
        }
        Ok(())
    }

    fn ensure_current(&self, step: StepId) -> Result<(), CoreError> {
        if step != self.current_step {
            return Err(CoreError::Validation(format!(
                "Step '{}' is not the current step ('{}')",
                step.title(),
                self.current_step.title()
            )));
        }
        Ok(())
    }

    /// Advance one step. Requires the current step to be valid.
    pub fn next(&mut self) -> Result<StepId, CoreError> {
        self.ensure_editable("advance")?;
        if self.current_step.is_last() {
            return Err(CoreError::Validation(
                "Already on the last step; complete the session instead".to_string(),
            ));
        }
        self.current_field_errors().into_result()?;
        self.current_step = StepId::from_index(self.current_step.index() + 1)?;
        Ok(self.current_step)
    }

    /// Go back one step. Payloads are untouched.
    pub fn back(&mut self) -> Result<StepId, CoreError> {
        self.ensure_editable("navigate")?;
        if self.current_step.is_first() {
            return Err(CoreError::Validation(
                "Already on the first step; cannot go back".to_string(),
            ));
        }
        self.current_step = StepId::from_index(self.current_step.index() - 1)?;
        Ok(self.current_step)
    }

    /// Replace the current step's payload.
    pub fn update_step(&mut self, payload: StepPayload) -> Result<(), CoreError> {
        self.ensure_editable("edit")?;
        self.ensure_current(payload.step())?;
        self.data.apply(payload);
        Ok(())
    }

    /// Offer files to a file field of the current step.
    ///
    /// `preview_url` is asked for a preview reference for every accepted
    /// image.
    pub fn add_files(
        &mut self,
        slot: FileSlot,
        candidates: Vec<FileCandidate>,
        preview_url: impl Fn(&UploadedFile) -> String,
    ) -> Result<UploadOutcome, CoreError> {
        self.ensure_editable("upload files to")?;
        self.ensure_current(slot.step())?;

        let policy = slot.policy();
        let outcome = self.data.with_slot(slot, |files| {
            let mut outcome = uploads::accept_files(files, candidates, &policy);
            for file in outcome.accepted.iter_mut().filter(|f| f.is_image()) {
                file.preview_url = Some(preview_url(file));
            }
            for file in files.iter_mut() {
                if let Some(accepted) = outcome.accepted.iter().find(|a| a.id == file.id) {
                    file.preview_url = accepted.preview_url.clone();
                }
            }
            outcome
        });
        Ok(outcome)
    }

    /// Remove a file from a file field of the current step.
    pub fn remove_file(&mut self, slot: FileSlot, id: Uuid) -> Result<UploadedFile, CoreError> {
        self.ensure_editable("remove files from")?;
        self.ensure_current(slot.step())?;
        self.data
            .with_slot(slot, |files| uploads::remove_file(files, id))
            .ok_or_else(|| CoreError::NotFound {
                entity: "UploadedFile",
                id: id.to_string(),
            })
    }

    /// Record an upload/verification result for a file in any step.
    pub fn set_file_status(
        &mut self,
        slot: FileSlot,
        id: Uuid,
        status: UploadStatus,
    ) -> Result<UploadedFile, CoreError> {
        if self.status == OnboardingStatus::Abandoned {
            return Err(CoreError::Validation(
                "Cannot update files of an abandoned session".to_string(),
            ));
        }
        self.data.with_slot(slot, |files| -> Result<UploadedFile, CoreError> {
            let file = files
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or_else(|| CoreError::NotFound {
                    entity: "UploadedFile",
                    id: id.to_string(),
                })?;
            file.transition_to(status)?;
            Ok(file.clone())
        })
    }

    /// Start the terminal submit. Only possible on the last step when it
    /// is valid.
    pub fn begin_submit(&mut self) -> Result<(), CoreError> {
        self.ensure_editable("complete")?;
        if !self.current_step.is_last() {
            return Err(CoreError::Validation(format!(
                "Cannot complete session: must be on the last step ({}), currently on {}",
                StepId::Payments.title(),
                self.current_step.title()
            )));
        }
        self.current_field_errors().into_result()?;
        self.submitting = true;
        self.last_error = None;
        Ok(())
    }

    /// Record the outcome of the terminal submit.
    ///
    /// On failure the session stays on the last step, editable, with the
    /// error recorded for display.
    pub fn finish_submit(&mut self, result: Result<(), String>) -> Result<(), CoreError> {
        if !self.submitting {
            return Err(CoreError::Conflict(
                "No submit in progress for this session".to_string(),
            ));
        }
        self.submitting = false;
        match result {
            Ok(()) => {
                self.status = OnboardingStatus::Completed;
                self.last_error = None;
            }
            Err(message) => self.last_error = Some(message),
        }
        Ok(())
    }

    /// Record the seller's payment account as known to the server.
    ///
    /// Returns whether the payments payload changed. Finished sessions are
    /// left untouched.
    pub fn link_payment_account(&mut self, account_id: Option<&str>) -> bool {
        if self.status != OnboardingStatus::InProgress {
            return false;
        }
        let connected = account_id.is_some();
        let account_id = account_id.map(str::to_string);
        let payments = &mut self.data.payments;
        if payments.stripe_connected == connected && payments.stripe_account_id == account_id {
            return false;
        }
        payments.stripe_connected = connected;
        payments.stripe_account_id = account_id;
        true
    }

    /// Clear the preview reference of every file for which `keep` is false.
    ///
    /// Returns the number of references cleared.
    pub fn drop_preview_urls(&mut self, keep: impl Fn(Uuid) -> bool) -> usize {
        let mut cleared = 0;
        for file in self.data.all_files_mut() {
            if file.preview_url.is_some() && !keep(file.id) {
                file.preview_url = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Discard the session.
    pub fn abandon(&mut self) -> Result<(), CoreError> {
        self.ensure_editable("abandon")?;
        self.status = OnboardingStatus::Abandoned;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    pub id: StepId,
    pub index: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub complete: bool,
    pub current: bool,
}

/// Everything the wizard shell renders for a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub status: OnboardingStatus,
    pub current_step: StepId,
    pub current_step_index: usize,
    pub total_steps: usize,
    pub progress_percent: f64,
    pub is_valid: bool,
    pub can_go_back: bool,
    pub can_go_next: bool,
    pub can_complete: bool,
    pub submitting: bool,
    pub last_error: Option<String>,
    pub field_errors: FieldErrors,
    pub steps: Vec<StepSummary>,
    pub data: OnboardingData,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
