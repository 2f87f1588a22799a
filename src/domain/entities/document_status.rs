use crate::domain::error::DomainError;
use crate::domain::values::approval::{CheckerStatus, MakerStatus, QaStatus, SignatureType};
use crate::domain::values::document_bucket::DocumentBucket;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    TradeConfirmation,
    ClientAgreement,
    RiskDisclosure,
    ComplianceChecklist,
    FrontOfficeSalesApproval,
    TradingSalesApproval,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::TradeConfirmation,
        DocumentType::ClientAgreement,
        DocumentType::RiskDisclosure,
        DocumentType::ComplianceChecklist,
        DocumentType::FrontOfficeSalesApproval,
        DocumentType::TradingSalesApproval,
    ];
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentType::TradeConfirmation => "tradeConfirmation",
            DocumentType::ClientAgreement => "clientAgreement",
            DocumentType::RiskDisclosure => "riskDisclosure",
            DocumentType::ComplianceChecklist => "complianceChecklist",
            DocumentType::FrontOfficeSalesApproval => "frontOfficeSalesApproval",
            DocumentType::TradingSalesApproval => "tradingSalesApproval",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DocumentType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown document type: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub submitted: bool,
    pub client_signed: bool,
    pub bank_signed: bool,
    pub sent_to_client: bool,
    pub version: u32,
    pub maker_status: MakerStatus,
    pub checker_status: CheckerStatus,
    pub qa_status: QaStatus,
    pub signature_type: SignatureType,
}

impl DocumentInfo {
    pub fn blank() -> Self {
        Self {
            submitted: false,
            client_signed: false,
            bank_signed: false,
            sent_to_client: false,
            version: 1,
            maker_status: MakerStatus::Pending,
            checker_status: CheckerStatus::Pending,
            qa_status: QaStatus::Pending,
            signature_type: SignatureType::None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.submitted && self.client_signed && self.bank_signed && self.qa_status == QaStatus::Approved
    }

    /// A document cannot be client-signed before submission, nor sent before QA approval.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.client_signed && !self.submitted {
            return Err(DomainError::InvalidInput(
                "document cannot be client-signed before it is submitted".into(),
            ));
        }
        if self.sent_to_client && self.qa_status != QaStatus::Approved {
            return Err(DomainError::InvalidInput(
                "document cannot be sent to the client before QA approval".into(),
            ));
        }
        Ok(())
    }
}

/// Partial update of one document. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    pub submitted: Option<bool>,
    pub client_signed: Option<bool>,
    pub bank_signed: Option<bool>,
    pub sent_to_client: Option<bool>,
    pub maker_status: Option<MakerStatus>,
    pub checker_status: Option<CheckerStatus>,
    pub qa_status: Option<QaStatus>,
    pub signature_type: Option<SignatureType>,
}

impl DocumentUpdate {
    pub fn is_empty(&self) -> bool {
        self.submitted.is_none()
            && self.client_signed.is_none()
            && self.bank_signed.is_none()
            && self.sent_to_client.is_none()
            && self.maker_status.is_none()
            && self.checker_status.is_none()
            && self.qa_status.is_none()
            && self.signature_type.is_none()
    }
}

/// The six-document pack tracked for every trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStatus {
    pub trade_id: String,
    pub trade_confirmation: DocumentInfo,
    pub client_agreement: DocumentInfo,
    pub risk_disclosure: DocumentInfo,
    pub compliance_checklist: DocumentInfo,
    pub front_office_sales_approval: DocumentInfo,
    pub trading_sales_approval: DocumentInfo,
}

impl DocumentStatus {
    pub fn get(&self, doc: DocumentType) -> &DocumentInfo {
        match doc {
            DocumentType::TradeConfirmation => &self.trade_confirmation,
            DocumentType::ClientAgreement => &self.client_agreement,
            DocumentType::RiskDisclosure => &self.risk_disclosure,
            DocumentType::ComplianceChecklist => &self.compliance_checklist,
            DocumentType::FrontOfficeSalesApproval => &self.front_office_sales_approval,
            DocumentType::TradingSalesApproval => &self.trading_sales_approval,
        }
    }

    pub fn get_mut(&mut self, doc: DocumentType) -> &mut DocumentInfo {
        match doc {
            DocumentType::TradeConfirmation => &mut self.trade_confirmation,
            DocumentType::ClientAgreement => &mut self.client_agreement,
            DocumentType::RiskDisclosure => &mut self.risk_disclosure,
            DocumentType::ComplianceChecklist => &mut self.compliance_checklist,
            DocumentType::FrontOfficeSalesApproval => &mut self.front_office_sales_approval,
            DocumentType::TradingSalesApproval => &mut self.trading_sales_approval,
        }
    }

    pub fn documents(&self) -> impl Iterator<Item = (DocumentType, &DocumentInfo)> {
        DocumentType::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    pub fn completeness(&self) -> DocumentBucket {
        let complete = self.documents().filter(|(_, info)| info.is_complete()).count();
        match complete {
            0 => DocumentBucket::Missing,
            n if n == DocumentType::ALL.len() => DocumentBucket::Complete,
            _ => DocumentBucket::Pending,
        }
    }

    /// Applies `update` to one document, rejecting it if the result breaks an invariant.
    /// The version only moves when the update is accepted.
    pub fn apply(&mut self, doc: DocumentType, update: &DocumentUpdate) -> Result<&DocumentInfo, DomainError> {
        if update.is_empty() {
            return Err(DomainError::InvalidInput(format!("empty update for {doc}")));
        }
        let mut next = self.get(doc).clone();
        if let Some(v) = update.submitted {
            next.submitted = v;
        }
        if let Some(v) = update.client_signed {
            next.client_signed = v;
        }
        if let Some(v) = update.bank_signed {
            next.bank_signed = v;
        }
        if let Some(v) = update.sent_to_client {
            next.sent_to_client = v;
        }
        if let Some(v) = update.maker_status {
            next.maker_status = v;
        }
        if let Some(v) = update.checker_status {
            next.checker_status = v;
        }
        if let Some(v) = update.qa_status {
            next.qa_status = v;
        }
        if let Some(v) = update.signature_type {
            next.signature_type = v;
        }
        next.validate()?;
        next.version += 1;

        let slot = self.get_mut(doc);
        *slot = next;
        Ok(&*slot)
    }
}
