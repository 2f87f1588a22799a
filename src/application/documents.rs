use crate::domain::entities::document_status::{DocumentInfo, DocumentStatus};
use crate::domain::values::approval::{CheckerStatus, MakerStatus, QaStatus, SignatureType};
use crate::domain::values::confirmation_status::ConfirmationStatus;

fn executed(signature_type: SignatureType) -> DocumentInfo {
    DocumentInfo {
        submitted: true,
        client_signed: true,
        bank_signed: true,
        sent_to_client: true,
        version: 1,
        maker_status: MakerStatus::Approved,
        checker_status: CheckerStatus::Approved,
        qa_status: QaStatus::Approved,
        signature_type,
    }
}

fn in_review() -> DocumentInfo {
    DocumentInfo {
        submitted: true,
        maker_status: MakerStatus::Created,
        qa_status: QaStatus::InReview,
        ..DocumentInfo::blank()
    }
}

/// Document pack for a trade, chosen by its confirmation status.
pub fn generate(trade_id: &str, status: ConfirmationStatus) -> DocumentStatus {
    match status {
        ConfirmationStatus::Confirmed | ConfirmationStatus::Settled => DocumentStatus {
            trade_id: trade_id.to_string(),
            trade_confirmation: executed(SignatureType::Electronic),
            client_agreement: executed(SignatureType::Wet),
            risk_disclosure: executed(SignatureType::Electronic),
            compliance_checklist: executed(SignatureType::Electronic),
            front_office_sales_approval: executed(SignatureType::Electronic),
            trading_sales_approval: executed(SignatureType::Electronic),
        },
        ConfirmationStatus::Pending => DocumentStatus {
            trade_id: trade_id.to_string(),
            trade_confirmation: DocumentInfo {
                checker_status: CheckerStatus::Reviewed,
                ..in_review()
            },
            client_agreement: executed(SignatureType::Wet),
            risk_disclosure: DocumentInfo {
                client_signed: true,
                ..in_review()
            },
            compliance_checklist: executed(SignatureType::Electronic),
            front_office_sales_approval: DocumentInfo {
                maker_status: MakerStatus::Approved,
                checker_status: CheckerStatus::Approved,
                ..in_review()
            },
            trading_sales_approval: DocumentInfo::blank(),
        },
        ConfirmationStatus::Failed | ConfirmationStatus::Disputed => DocumentStatus {
            trade_id: trade_id.to_string(),
            trade_confirmation: DocumentInfo {
                submitted: true,
                version: 2,
                maker_status: MakerStatus::Created,
                checker_status: CheckerStatus::Reviewed,
                qa_status: QaStatus::Rejected,
                ..DocumentInfo::blank()
            },
            client_agreement: DocumentInfo::blank(),
            risk_disclosure: DocumentInfo {
                client_signed: true,
                signature_type: SignatureType::Electronic,
                ..in_review()
            },
            compliance_checklist: executed(SignatureType::Electronic),
            front_office_sales_approval: DocumentInfo {
                submitted: true,
                maker_status: MakerStatus::Approved,
                ..DocumentInfo::blank()
            },
            trading_sales_approval: DocumentInfo::blank(),
        },
    }
}

/// Pack used for trades that have no record yet.
pub fn blank(trade_id: &str) -> DocumentStatus {
    DocumentStatus {
        trade_id: trade_id.to_string(),
        trade_confirmation: DocumentInfo::blank(),
        client_agreement: DocumentInfo::blank(),
        risk_disclosure: DocumentInfo::blank(),
        compliance_checklist: DocumentInfo::blank(),
        front_office_sales_approval: DocumentInfo::blank(),
        trading_sales_approval: DocumentInfo::blank(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::document_status::DocumentType;
    use crate::domain::values::document_bucket::DocumentBucket;

    #[test]
    fn buckets_follow_status() {
        assert_eq!(generate("T", ConfirmationStatus::Settled).completeness(), DocumentBucket::Complete);
        assert_eq!(generate("T", ConfirmationStatus::Confirmed).completeness(), DocumentBucket::Complete);
        assert_eq!(generate("T", ConfirmationStatus::Pending).completeness(), DocumentBucket::Pending);
        assert_eq!(generate("T", ConfirmationStatus::Failed).completeness(), DocumentBucket::Pending);
        assert_eq!(blank("T").completeness(), DocumentBucket::Missing);
    }

    #[test]
    fn pending_pack_has_two_complete_documents() {
        let pack = generate("T", ConfirmationStatus::Pending);
        let complete: Vec<DocumentType> = pack
            .documents()
            .filter(|(_, d)| d.is_complete())
            .map(|(t, _)| t)
            .collect();
        assert_eq!(complete, vec![DocumentType::ClientAgreement, DocumentType::ComplianceChecklist]);
        assert!(!pack.trading_sales_approval.submitted);
    }

    #[test]
    fn broken_pack_shape() {
        let pack = generate("T", ConfirmationStatus::Disputed);
        assert_eq!(pack.trade_confirmation.qa_status, QaStatus::Rejected);
        assert_eq!(pack.trade_confirmation.version, 2);
        assert!(!pack.client_agreement.submitted);
        assert!(pack.risk_disclosure.client_signed && !pack.risk_disclosure.bank_signed);
    }

    #[test]
    fn templates_satisfy_document_invariants() {
        for status in ConfirmationStatus::ALL {
            let pack = generate("T", status);
            for (doc, info) in pack.documents() {
                assert!(info.validate().is_ok(), "{status} {doc}");
            }
        }
    }
}
