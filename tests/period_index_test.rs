#[cfg(test)]
mod tests {
    use corrections_pipeline::utils::test_utils::{closed_period, ymd};
    use corrections_pipeline::{
        AdmissionReason, CustodialAuthority, DateRange, IncarcerationPeriod, PeriodIndex,
        PipelineError, ReleaseReason,
    };

    #[test]
    fn test_months_excluded_from_supervision_population() {
        let period = closed_period(1111, ymd(2019, 11, 14), ymd(2020, 2, 3));
        let index = PeriodIndex::new(vec![period]).expect("index should build");

        let excluded = index.months_excluded_from_supervision_population();
        assert!(excluded.contains(&(2019, 12)));
        assert!(excluded.contains(&(2020, 1)));
        // Partial months at either edge are not fully covered
        assert!(!excluded.contains(&(2019, 11)));
        assert!(!excluded.contains(&(2020, 2)));
    }

    #[test]
    fn test_months_excluded_combines_adjacent_periods() {
        // Two periods meeting mid-month jointly cover December
        let first = IncarcerationPeriod {
            release_reason: Some(ReleaseReason::Transfer),
            ..closed_period(1111, ymd(2019, 12, 1), ymd(2019, 12, 15))
        };
        let second = IncarcerationPeriod {
            admission_reason: Some(AdmissionReason::Transfer),
            ..closed_period(2222, ymd(2019, 12, 15), ymd(2020, 1, 1))
        };
        let index = PeriodIndex::new(vec![first, second]).expect("index should build");

        assert!(
            index
                .months_excluded_from_supervision_population()
                .contains(&(2019, 12))
        );
    }

    #[test]
    fn test_supervision_authority_periods_do_not_exclude_months() {
        let supervision_custody = IncarcerationPeriod {
            custodial_authority: Some(CustodialAuthority::SupervisionAuthority),
            ..closed_period(1111, ymd(2019, 11, 1), ymd(2020, 3, 1))
        };
        let index = PeriodIndex::new(vec![supervision_custody]).expect("index should build");

        assert!(index.periods_not_under_supervision_authority().is_empty());
        assert!(index.months_excluded_from_supervision_population().is_empty());
        assert!(!index.is_excluded_from_supervision_population_for_range(&DateRange::new(
            ymd(2019, 12, 1),
            ymd(2020, 1, 1),
        )));
    }

    #[test]
    fn test_is_excluded_from_supervision_population_for_range() {
        let period = closed_period(1111, ymd(2019, 11, 14), ymd(2020, 2, 3));
        let index = PeriodIndex::new(vec![period]).expect("index should build");

        // Entirely inside the incarceration, within a partially covered month
        assert!(index.is_excluded_from_supervision_population_for_range(&DateRange::new(
            ymd(2019, 11, 20),
            ymd(2019, 11, 25),
        )));
        // Spanning fully covered months
        assert!(index.is_excluded_from_supervision_population_for_range(&DateRange::new(
            ymd(2019, 12, 1),
            ymd(2020, 2, 1),
        )));
        // Extending past the release
        assert!(!index.is_excluded_from_supervision_population_for_range(&DateRange::new(
            ymd(2020, 1, 15),
            ymd(2020, 3, 1),
        )));
        // Before the admission
        assert!(!index.is_excluded_from_supervision_population_for_range(&DateRange::new(
            ymd(2019, 10, 1),
            ymd(2019, 10, 15),
        )));
        // An empty range overlaps no months
        assert!(!index.is_excluded_from_supervision_population_for_range(&DateRange::new(
            ymd(2019, 12, 1),
            ymd(2019, 12, 1),
        )));
    }

    #[test]
    fn test_incarceration_admissions_between_dates() {
        let period = closed_period(1111, ymd(2019, 11, 14), ymd(2020, 2, 3));
        let index = PeriodIndex::new(vec![period]).expect("index should build");

        assert!(index.incarceration_admissions_between_dates(ymd(2019, 11, 1), ymd(2019, 12, 1)));
        assert!(index.incarceration_admissions_between_dates(ymd(2019, 11, 14), ymd(2019, 11, 15)));
        // The end date is exclusive
        assert!(!index.incarceration_admissions_between_dates(ymd(2019, 11, 1), ymd(2019, 11, 14)));
        assert!(!index.incarceration_admissions_between_dates(ymd(2020, 1, 1), ymd(2020, 2, 1)));
    }

    #[test]
    fn test_periods_with_admissions_between_dates() {
        let first = closed_period(1111, ymd(2019, 11, 14), ymd(2019, 12, 3));
        let second = closed_period(2222, ymd(2019, 11, 20), ymd(2020, 1, 8));
        let third = closed_period(3333, ymd(2020, 3, 1), ymd(2020, 6, 1));
        let index = PeriodIndex::new(vec![first.clone(), second.clone(), third])
            .expect("index should build");

        let matches =
            index.periods_with_admissions_between_dates(ymd(2019, 11, 1), ymd(2019, 12, 1));
        assert_eq!(vec![&first, &second], matches);
    }

    #[test]
    fn test_periods_by_admission_date() {
        let first = closed_period(1111, ymd(2019, 11, 14), ymd(2019, 12, 3));
        let second = closed_period(2222, ymd(2019, 11, 14), ymd(2020, 1, 8));
        let index =
            PeriodIndex::new(vec![first.clone(), second.clone()]).expect("index should build");

        assert_eq!(
            vec![&first, &second],
            index.periods_by_admission_date(ymd(2019, 11, 14))
        );
        assert!(index.periods_by_admission_date(ymd(2019, 11, 15)).is_empty());
    }

    #[test]
    fn test_preceding_period() {
        let first = closed_period(1111, ymd(2008, 11, 20), ymd(2010, 12, 4));
        let second = closed_period(2222, ymd(2011, 3, 4), ymd(2014, 4, 14));
        let index =
            PeriodIndex::new(vec![first.clone(), second.clone()]).expect("index should build");

        assert_eq!(
            None,
            index.preceding_period(&first).expect("member lookup")
        );
        assert_eq!(
            Some(&first),
            index.preceding_period(&second).expect("member lookup")
        );
    }

    #[test]
    fn test_preceding_period_unknown_period_is_an_error() {
        let first = closed_period(1111, ymd(2008, 11, 20), ymd(2010, 12, 4));
        let stranger = closed_period(9999, ymd(2001, 1, 1), ymd(2002, 1, 1));
        let index = PeriodIndex::new(vec![first]).expect("index should build");

        let result = index.preceding_period(&stranger);
        assert!(matches!(
            result,
            Err(PipelineError::PeriodNotInIndex { period_id: 9999 })
        ));
    }

    #[test]
    fn test_original_admission_reasons_follow_transfer_chains() {
        let committed = IncarcerationPeriod {
            admission_reason_raw_text: Some("NA".to_string()),
            release_reason: Some(ReleaseReason::Transfer),
            ..closed_period(1111, ymd(2008, 11, 20), ymd(2009, 3, 1))
        };
        let transferred = IncarcerationPeriod {
            admission_reason: Some(AdmissionReason::Transfer),
            release_reason: Some(ReleaseReason::ConditionalRelease),
            ..closed_period(2222, ymd(2009, 3, 1), ymd(2010, 1, 1))
        };
        let reincarcerated = IncarcerationPeriod {
            admission_reason: Some(AdmissionReason::ParoleRevocation),
            ..closed_period(3333, ymd(2012, 5, 1), ymd(2013, 1, 1))
        };
        let index = PeriodIndex::new(vec![committed, transferred, reincarcerated])
            .expect("index should build");

        let reasons = index.original_admission_reasons_by_period_id();
        // The transfer-chained period reports the commitment that started
        // the stint, not the transfer-in
        assert_eq!(
            reasons[&1111],
            (AdmissionReason::NewAdmission, Some("NA".to_string()))
        );
        assert_eq!(
            reasons[&2222],
            (AdmissionReason::NewAdmission, Some("NA".to_string()))
        );
        // The conditional release officially ended the stint, so the next
        // period starts a fresh chain
        assert_eq!(reasons[&3333], (AdmissionReason::ParoleRevocation, None));
    }

    #[test]
    fn test_original_admission_reasons_first_period_starts_chain() {
        // Even a non-official first admission anchors the chain
        let transfer_first = IncarcerationPeriod {
            admission_reason: Some(AdmissionReason::Transfer),
            release_reason: Some(ReleaseReason::Transfer),
            ..closed_period(1111, ymd(2008, 11, 20), ymd(2009, 3, 1))
        };
        let transferred_again = IncarcerationPeriod {
            admission_reason: Some(AdmissionReason::Transfer),
            ..closed_period(2222, ymd(2009, 3, 1), ymd(2010, 1, 1))
        };
        let index = PeriodIndex::new(vec![transfer_first, transferred_again])
            .expect("index should build");

        let reasons = index.original_admission_reasons_by_period_id();
        assert_eq!(reasons[&1111], (AdmissionReason::Transfer, None));
        assert_eq!(reasons[&2222], (AdmissionReason::Transfer, None));
    }

    #[test]
    fn test_index_requires_period_ids() {
        let mut period = closed_period(1111, ymd(2008, 11, 20), ymd(2010, 12, 4));
        period.period_id = None;

        let result = PeriodIndex::new(vec![period]);
        assert!(matches!(result, Err(PipelineError::MissingPeriodId)));
    }

    #[test]
    fn test_index_requires_admission_reasons() {
        let mut period = closed_period(1111, ymd(2008, 11, 20), ymd(2010, 12, 4));
        period.admission_reason = None;

        let result = PeriodIndex::new(vec![period]);
        assert!(matches!(
            result,
            Err(PipelineError::MissingAdmissionReason { period_id: 1111 })
        ));
    }
}
