//! Report generation business logic.
//!
//! Every function here is a pure computation over a [`Snapshot`] and is
//! recomputed on each call. Nothing is cached and nothing touches the store.

use crate::{
    core::{
        billing::{self, BillingPeriod},
        invoice::{self, AgingBucket},
        snapshot::Snapshot,
    },
    entities::{BillStatus, ExpenseCategory, PaymentStatus, RoomStatus, RoomType, TenantStatus},
    models::Bill,
};
use chrono::NaiveDate;
use sea_orm::Iterable;
use std::collections::BTreeMap;

/// Headline figures for the back office dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    /// All rooms
    pub total_rooms: usize,
    /// Rooms marked occupied
    pub occupied_rooms: usize,
    /// Rooms marked vacant
    pub vacant_rooms: usize,
    /// Rooms under maintenance
    pub maintenance_rooms: usize,
    /// Occupied share of all rooms, rounded percent
    pub occupancy_rate: u32,
    /// Tenants in any status
    pub total_tenants: usize,
    /// Tenants in an active-like status
    pub active_tenants: usize,
    /// Sum of monthly rent over all tenants
    pub total_monthly_rent: f64,
    /// Sum of security deposits over all tenants
    pub total_security_deposit: f64,
    /// Sum of monthly rent over active-like tenants
    pub active_monthly_rent: f64,
    /// Totals of paid bills for the current period
    pub monthly_collection: f64,
    /// Sum of every completed payment
    pub total_collected: f64,
    /// Balance still owed on unsettled bills
    pub outstanding_amount: f64,
    /// Unsettled bills past their due date
    pub overdue_bills: usize,
    /// Expenses dated in the current month
    pub monthly_expenses: f64,
    /// Paid share of all bills, rounded percent
    pub collection_rate: u32,
    /// Monthly collection less monthly expenses
    pub net_income: f64,
}

/// Occupied and total rooms for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Occupancy {
    /// Rooms marked occupied
    pub occupied: usize,
    /// All rooms in the group
    pub total: usize,
}

impl Occupancy {
    /// Occupied share, rounded percent.
    #[must_use]
    pub fn rate(self) -> u32 {
        billing::occupancy_rate(self.total, self.occupied)
    }

    fn count(&mut self, status: RoomStatus) {
        self.total += 1;
        if status == RoomStatus::Occupied {
            self.occupied += 1;
        }
    }
}

/// Metered electricity totals from the reading log.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElectricityStats {
    /// Number of readings
    pub readings: usize,
    /// Units over all readings
    pub total_units: i64,
    /// Amount over all readings
    pub total_amount: f64,
    /// Amount of readings marked paid
    pub collected_amount: f64,
    /// Amount of readings not yet paid
    pub pending_amount: f64,
    /// Units read this month
    pub current_month_units: i64,
    /// Amount read this month
    pub current_month_amount: f64,
}

/// Projected room availability for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacancyForecast {
    /// Forecast month
    pub period: BillingPeriod,
    /// Active-like tenants whose departure date falls in the month
    pub departing_tenants: Vec<i64>,
    /// Vacant rooms today plus this month's departures
    pub available: usize,
    /// Vacant rooms today plus departures up to and including this month
    pub cumulative_available: usize,
}

/// Money in and out for one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTrend {
    /// Month
    pub period: BillingPeriod,
    /// Totals of bills issued for the month
    pub billed: f64,
    /// Completed payments received in the month
    pub collected: f64,
    /// Expenses dated in the month
    pub expenses: f64,
}

/// Expense total for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryTotal {
    /// Category
    pub category: ExpenseCategory,
    /// Number of expenses
    pub count: usize,
    /// Sum of amounts
    pub total: f64,
}

/// Outstanding bills in one age bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgingRow {
    /// Age bucket
    pub bucket: AgingBucket,
    /// Number of bills
    pub bills: usize,
    /// Balance owed on them
    pub amount: f64,
}

/// Tenant count for every status, in declaration order. Statuses with no
/// tenants are listed with zero.
#[must_use]
pub fn tenant_status_counts(snapshot: &Snapshot) -> Vec<(TenantStatus, usize)> {
    TenantStatus::iter()
        .map(|status| {
            let count = snapshot.tenants.iter().filter(|t| t.status == status).count();
            (status, count)
        })
        .collect()
}

/// Sum of completed payments recorded against a bill.
#[must_use]
pub fn amount_paid(snapshot: &Snapshot, bill_id: i64) -> f64 {
    snapshot
        .payments_for_bill(bill_id)
        .filter(|p| p.status == PaymentStatus::Completed)
        .map(|p| p.amount)
        .sum()
}

/// What is still owed on a bill; zero once it is paid.
#[must_use]
pub fn balance_due(snapshot: &Snapshot, bill: &Bill) -> f64 {
    if bill.payment_status.is_outstanding() {
        (bill.total_amount - amount_paid(snapshot, bill.id)).max(0.0)
    } else {
        0.0
    }
}

/// Builds the dashboard as of `today`.
#[must_use]
pub fn dashboard(snapshot: &Snapshot, today: NaiveDate) -> DashboardStats {
    let period = BillingPeriod::from_date(today);
    let period_key = period.to_string();

    let count_rooms = |status: RoomStatus| snapshot.rooms.iter().filter(|r| r.status == status).count();
    let total_rooms = snapshot.rooms.len();
    let occupied_rooms = count_rooms(RoomStatus::Occupied);

    let paid_bills = snapshot
        .bills
        .iter()
        .filter(|b| b.payment_status == BillStatus::Paid)
        .count();
    let monthly_collection = snapshot
        .bills
        .iter()
        .filter(|b| b.payment_status == BillStatus::Paid && b.billing_period == period_key)
        .map(|b| b.total_amount)
        .sum::<f64>();
    let monthly_expenses = snapshot
        .expenses
        .iter()
        .filter(|e| period.contains(e.expense_date))
        .map(|e| e.amount)
        .sum::<f64>();

    DashboardStats {
        total_rooms,
        occupied_rooms,
        vacant_rooms: count_rooms(RoomStatus::Vacant),
        maintenance_rooms: count_rooms(RoomStatus::Maintenance),
        occupancy_rate: billing::occupancy_rate(total_rooms, occupied_rooms),
        total_tenants: snapshot.tenants.len(),
        active_tenants: snapshot.active_tenants().count(),
        total_monthly_rent: snapshot.tenants.iter().map(|t| t.monthly_rent).sum(),
        total_security_deposit: snapshot.tenants.iter().map(|t| t.security_deposit).sum(),
        active_monthly_rent: snapshot.active_tenants().map(|t| t.monthly_rent).sum(),
        monthly_collection,
        total_collected: snapshot
            .payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .map(|p| p.amount)
            .sum(),
        outstanding_amount: snapshot.bills.iter().map(|b| balance_due(snapshot, b)).sum(),
        overdue_bills: snapshot
            .bills
            .iter()
            .filter(|b| invoice::is_overdue(b, today))
            .count(),
        monthly_expenses,
        collection_rate: billing::collection_rate(snapshot.bills.len(), paid_bills),
        net_income: monthly_collection - monthly_expenses,
    }
}

/// Occupancy per room type, every type listed.
#[must_use]
pub fn room_type_breakdown(snapshot: &Snapshot) -> Vec<(RoomType, Occupancy)> {
    RoomType::iter()
        .map(|room_type| {
            let mut occupancy = Occupancy::default();
            for room in snapshot.rooms.iter().filter(|r| r.room_type == room_type) {
                occupancy.count(room.status);
            }
            (room_type, occupancy)
        })
        .collect()
}

/// Occupancy per floor, lowest floor first. Rooms whose floor is neither
/// stored nor derivable from the room number are grouped under `None`.
#[must_use]
pub fn floor_breakdown(snapshot: &Snapshot) -> Vec<(Option<i32>, Occupancy)> {
    let mut floors: BTreeMap<Option<i32>, Occupancy> = BTreeMap::new();
    for room in &snapshot.rooms {
        floors
            .entry(room.floor_number())
            .or_default()
            .count(room.status);
    }
    floors.into_iter().collect()
}

/// Totals over the meter reading log.
#[must_use]
pub fn electricity_stats(snapshot: &Snapshot, today: NaiveDate) -> ElectricityStats {
    let period = BillingPeriod::from_date(today);
    let mut stats = ElectricityStats::default();

    for reading in &snapshot.readings {
        stats.readings += 1;
        stats.total_units += reading.units_consumed;
        stats.total_amount += reading.amount;
        if reading.is_paid {
            stats.collected_amount += reading.amount;
        } else {
            stats.pending_amount += reading.amount;
        }
        if period.contains(reading.reading_date) {
            stats.current_month_units += reading.units_consumed;
            stats.current_month_amount += reading.amount;
        }
    }
    stats
}

/// Room availability for `months` months starting with the current one.
///
/// `available` counts each month on its own: rooms vacant today plus that
/// month's departures. `cumulative_available` also keeps the departures of
/// earlier forecast months.
#[must_use]
pub fn vacancy_forecast(snapshot: &Snapshot, today: NaiveDate, months: u32) -> Vec<VacancyForecast> {
    let vacant_now = snapshot
        .rooms
        .iter()
        .filter(|r| r.status == RoomStatus::Vacant)
        .count();

    let mut period = BillingPeriod::from_date(today);
    let mut departed_so_far = 0;
    let mut forecast = Vec::new();

    for _ in 0..months {
        let departing_tenants: Vec<i64> = snapshot
            .active_tenants()
            .filter(|t| t.departure_date.is_some_and(|d| period.contains(d)))
            .map(|t| t.id)
            .collect();
        departed_so_far += departing_tenants.len();

        forecast.push(VacancyForecast {
            period,
            available: vacant_now + departing_tenants.len(),
            cumulative_available: vacant_now + departed_so_far,
            departing_tenants,
        });
        period = period.next();
    }
    forecast
}

/// Billed, collected and spent for the last `months` months, oldest first,
/// ending with the current month.
#[must_use]
pub fn monthly_trend(snapshot: &Snapshot, today: NaiveDate, months: u32) -> Vec<MonthlyTrend> {
    let mut periods = Vec::new();
    let mut period = BillingPeriod::from_date(today);
    for _ in 0..months {
        periods.push(period);
        period = period.previous();
    }
    periods.reverse();

    periods
        .into_iter()
        .map(|period| {
            let key = period.to_string();
            MonthlyTrend {
                period,
                billed: snapshot
                    .bills
                    .iter()
                    .filter(|b| b.billing_period == key)
                    .map(|b| b.total_amount)
                    .sum(),
                collected: snapshot
                    .payments
                    .iter()
                    .filter(|p| {
                        p.status == PaymentStatus::Completed && period.contains(p.payment_date)
                    })
                    .map(|p| p.amount)
                    .sum(),
                expenses: snapshot
                    .expenses
                    .iter()
                    .filter(|e| period.contains(e.expense_date))
                    .map(|e| e.amount)
                    .sum(),
            }
        })
        .collect()
}

/// Expense totals per category, largest first. Categories without expenses
/// are left out.
#[must_use]
pub fn expense_breakdown(snapshot: &Snapshot) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = ExpenseCategory::iter()
        .map(|category| {
            let matching = snapshot.expenses.iter().filter(|e| e.category == category);
            CategoryTotal {
                category,
                count: matching.clone().count(),
                total: matching.map(|e| e.amount).sum(),
            }
        })
        .filter(|c| c.count > 0)
        .collect();
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// Unsettled bills grouped by how long they have been overdue. Every bucket
/// is listed, youngest first.
#[must_use]
pub fn aging_report(snapshot: &Snapshot, today: NaiveDate) -> Vec<AgingRow> {
    let mut rows: Vec<AgingRow> = AgingBucket::ALL
        .iter()
        .map(|&bucket| AgingRow {
            bucket,
            bills: 0,
            amount: 0.0,
        })
        .collect();

    for bill in snapshot
        .bills
        .iter()
        .filter(|b| b.payment_status.is_outstanding())
    {
        let bucket = invoice::aging_bucket(invoice::days_overdue_for(bill, today));
        if let Some(row) = rows.iter_mut().find(|r| r.bucket == bucket) {
            row.bills += 1;
            row.amount += balance_due(snapshot, bill);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::PaymentMethod;
    use crate::models::{Expense, Payment, Room, Tenant};
    use crate::test_utils::date;

    fn room(id: i64, number: &str, room_type: RoomType, status: RoomStatus) -> Room {
        Room {
            id,
            room_number: number.to_string(),
            floor: None,
            room_type,
            capacity: room_type.default_capacity(),
            rent_amount: 8000.0,
            status,
            tenant_id: None,
            created_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    fn tenant(id: i64, room_number: &str, status: TenantStatus) -> Tenant {
        let stamp = date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        Tenant {
            id,
            name: format!("Tenant {id}"),
            mobile: "9876543210".to_string(),
            room_number: room_number.to_string(),
            join_date: date(2024, 1, 1),
            monthly_rent: 8000.0,
            security_deposit: 16000.0,
            electricity_joining_reading: 1000,
            last_electricity_reading: None,
            status,
            departure_date: None,
            notice_given: false,
            notice_date: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn bill(id: i64, period: &str, total: f64, status: BillStatus, due: NaiveDate) -> Bill {
        Bill {
            id,
            tenant_id: 1,
            billing_period: period.to_string(),
            electricity_reading: 1100,
            previous_reading: 1000,
            rent_amount: total,
            electricity_charges: 0.0,
            adjustments: 0.0,
            total_amount: total,
            bill_date: due - chrono::Duration::days(10),
            due_date: due,
            payment_status: status,
            payment_date: None,
            payment_method: None,
            created_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    fn payment(id: i64, bill_id: i64, amount: f64, paid_on: NaiveDate) -> Payment {
        Payment {
            id,
            bill_id,
            tenant_id: 1,
            amount,
            payment_date: paid_on,
            payment_method: PaymentMethod::Cash,
            status: PaymentStatus::Completed,
            notes: None,
            created_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    fn expense(id: i64, category: ExpenseCategory, amount: f64, on: NaiveDate) -> Expense {
        Expense {
            id,
            expense_date: on,
            category,
            description: "test".to_string(),
            amount,
            payment_method: PaymentMethod::Cash,
            receipt_ref: None,
            created_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    /// Eight rooms, three of them occupied.
    fn eight_room_snapshot() -> Snapshot {
        let mut rooms = Vec::new();
        for (i, number) in ["G1", "G2", "101", "102", "103", "201", "202", "203"]
            .iter()
            .enumerate()
        {
            let status = if i < 3 {
                RoomStatus::Occupied
            } else {
                RoomStatus::Vacant
            };
            rooms.push(room(i as i64 + 1, number, RoomType::Double, status));
        }
        Snapshot {
            rooms,
            ..Default::default()
        }
    }

    #[test]
    fn test_dashboard_occupancy_rate_rounds() {
        let stats = dashboard(&eight_room_snapshot(), date(2024, 3, 15));
        assert_eq!(stats.total_rooms, 8);
        assert_eq!(stats.occupied_rooms, 3);
        assert_eq!(stats.vacant_rooms, 5);
        assert_eq!(stats.occupancy_rate, 38);
    }

    #[test]
    fn test_dashboard_on_empty_snapshot() {
        let stats = dashboard(&Snapshot::default(), date(2024, 3, 15));
        assert_eq!(stats.occupancy_rate, 0);
        assert_eq!(stats.collection_rate, 0);
        assert_eq!(stats.net_income, 0.0);
    }

    #[test]
    fn test_dashboard_money_figures() {
        let mut snapshot = eight_room_snapshot();
        snapshot.tenants = vec![
            tenant(1, "G1", TenantStatus::Active),
            tenant(2, "G2", TenantStatus::Due),
            tenant(3, "101", TenantStatus::Left),
        ];
        snapshot.bills = vec![
            bill(1, "2024-03", 9560.0, BillStatus::Paid, date(2024, 3, 11)),
            bill(2, "2024-03", 7800.0, BillStatus::Partial, date(2024, 3, 11)),
            bill(3, "2024-02", 8000.0, BillStatus::Paid, date(2024, 2, 11)),
            bill(4, "2024-03", 8200.0, BillStatus::Unpaid, date(2024, 3, 25)),
        ];
        snapshot.payments = vec![
            payment(1, 1, 9560.0, date(2024, 3, 5)),
            payment(2, 2, 4000.0, date(2024, 3, 6)),
            payment(3, 3, 8000.0, date(2024, 2, 5)),
        ];
        snapshot.expenses = vec![
            expense(1, ExpenseCategory::Water, 500.0, date(2024, 3, 3)),
            expense(2, ExpenseCategory::Repairs, 1500.0, date(2024, 2, 3)),
        ];

        let stats = dashboard(&snapshot, date(2024, 3, 15));
        assert_eq!(stats.total_tenants, 3);
        assert_eq!(stats.active_tenants, 2);
        // Rent and deposit totals ignore status
        assert_eq!(stats.total_monthly_rent, 24000.0);
        assert_eq!(stats.total_security_deposit, 48000.0);
        assert_eq!(stats.active_monthly_rent, 16000.0);
        assert_eq!(stats.monthly_collection, 9560.0);
        assert_eq!(stats.total_collected, 21560.0);
        assert_eq!(stats.outstanding_amount, 3800.0 + 8200.0);
        assert_eq!(stats.overdue_bills, 1);
        assert_eq!(stats.monthly_expenses, 500.0);
        assert_eq!(stats.collection_rate, 50);
        assert_eq!(stats.net_income, 9060.0);
    }

    #[test]
    fn test_tenant_status_counts_cover_every_status() {
        let snapshot = Snapshot {
            tenants: vec![
                tenant(1, "101", TenantStatus::Active),
                tenant(2, "101", TenantStatus::Active),
                tenant(3, "102", TenantStatus::Left),
            ],
            ..Default::default()
        };
        let counts = tenant_status_counts(&snapshot);
        assert_eq!(counts.len(), 11);
        assert!(counts.contains(&(TenantStatus::Active, 2)));
        assert!(counts.contains(&(TenantStatus::Left, 1)));
        assert!(counts.contains(&(TenantStatus::Hold, 0)));
    }

    #[test]
    fn test_room_type_and_floor_breakdowns() {
        let snapshot = Snapshot {
            rooms: vec![
                room(1, "G1", RoomType::Single, RoomStatus::Occupied),
                room(2, "101", RoomType::Double, RoomStatus::Occupied),
                room(3, "102", RoomType::Double, RoomStatus::Vacant),
                room(4, "201", RoomType::Quad, RoomStatus::Maintenance),
            ],
            ..Default::default()
        };

        let by_type = room_type_breakdown(&snapshot);
        assert_eq!(by_type.len(), 4);
        assert!(by_type.contains(&(RoomType::Double, Occupancy { occupied: 1, total: 2 })));
        assert!(by_type.contains(&(RoomType::Triple, Occupancy::default())));

        let by_floor = floor_breakdown(&snapshot);
        assert_eq!(
            by_floor,
            vec![
                (Some(0), Occupancy { occupied: 1, total: 1 }),
                (Some(1), Occupancy { occupied: 1, total: 2 }),
                (Some(2), Occupancy { occupied: 0, total: 1 }),
            ]
        );
        assert_eq!(by_floor[1].1.rate(), 50);
    }

    #[test]
    fn test_electricity_stats() {
        let stamp = date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        let reading = |id, units: i64, paid, on| crate::models::ElectricityReading {
            id,
            room_number: "101".to_string(),
            reading_date: on,
            previous_reading: 0,
            current_reading: units,
            units_consumed: units,
            rate_per_unit: 12.0,
            amount: units as f64 * 12.0,
            is_paid: paid,
            created_at: stamp,
        };
        let snapshot = Snapshot {
            readings: vec![
                reading(1, 50, true, date(2024, 2, 1)),
                reading(2, 30, false, date(2024, 3, 1)),
            ],
            ..Default::default()
        };

        let stats = electricity_stats(&snapshot, date(2024, 3, 20));
        assert_eq!(stats.readings, 2);
        assert_eq!(stats.total_units, 80);
        assert_eq!(stats.total_amount, 960.0);
        assert_eq!(stats.collected_amount, 600.0);
        assert_eq!(stats.pending_amount, 360.0);
        assert_eq!(stats.current_month_units, 30);
        assert_eq!(stats.current_month_amount, 360.0);
    }

    #[test]
    fn test_vacancy_forecast_counts_departures_per_month() {
        let mut snapshot = eight_room_snapshot();
        let mut leaving_april = tenant(1, "G1", TenantStatus::Departing);
        leaving_april.departure_date = Some(date(2024, 4, 30));
        let mut leaving_may = tenant(2, "G2", TenantStatus::Active);
        leaving_may.departure_date = Some(date(2024, 5, 10));
        // Already gone, not eligible
        let mut gone = tenant(3, "101", TenantStatus::Left);
        gone.departure_date = Some(date(2024, 4, 2));
        snapshot.tenants = vec![leaving_april, leaving_may, gone];

        let forecast = vacancy_forecast(&snapshot, date(2024, 3, 15), 3);
        assert_eq!(forecast.len(), 3);

        assert_eq!(forecast[0].period.to_string(), "2024-03");
        assert_eq!(forecast[0].available, 5);
        assert!(forecast[0].departing_tenants.is_empty());

        assert_eq!(forecast[1].departing_tenants, vec![1]);
        assert_eq!(forecast[1].available, 6);
        assert_eq!(forecast[1].cumulative_available, 6);

        // No compounding in `available`, departures carried in the cumulative figure
        assert_eq!(forecast[2].departing_tenants, vec![2]);
        assert_eq!(forecast[2].available, 6);
        assert_eq!(forecast[2].cumulative_available, 7);
    }

    #[test]
    fn test_monthly_trend_oldest_first() {
        let snapshot = Snapshot {
            bills: vec![
                bill(1, "2024-03", 9000.0, BillStatus::Paid, date(2024, 3, 11)),
                bill(2, "2024-01", 8000.0, BillStatus::Unpaid, date(2024, 1, 11)),
            ],
            payments: vec![payment(1, 1, 9000.0, date(2024, 3, 4))],
            expenses: vec![expense(1, ExpenseCategory::Internet, 999.0, date(2024, 2, 2))],
            ..Default::default()
        };

        let trend = monthly_trend(&snapshot, date(2024, 3, 20), 3);
        let periods: Vec<String> = trend.iter().map(|t| t.period.to_string()).collect();
        assert_eq!(periods, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(trend[0].billed, 8000.0);
        assert_eq!(trend[1].expenses, 999.0);
        assert_eq!(trend[2].billed, 9000.0);
        assert_eq!(trend[2].collected, 9000.0);
    }

    #[test]
    fn test_expense_breakdown_largest_first() {
        let snapshot = Snapshot {
            expenses: vec![
                expense(1, ExpenseCategory::Water, 500.0, date(2024, 3, 1)),
                expense(2, ExpenseCategory::Repairs, 1500.0, date(2024, 3, 2)),
                expense(3, ExpenseCategory::Water, 700.0, date(2024, 3, 3)),
            ],
            ..Default::default()
        };

        let breakdown = expense_breakdown(&snapshot);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, ExpenseCategory::Repairs);
        assert_eq!(breakdown[1].category, ExpenseCategory::Water);
        assert_eq!(breakdown[1].count, 2);
        assert_eq!(breakdown[1].total, 1200.0);
    }

    #[test]
    fn test_aging_report_buckets_outstanding_balance() {
        let snapshot = Snapshot {
            bills: vec![
                bill(1, "2024-03", 7800.0, BillStatus::Partial, date(2024, 3, 11)),
                bill(2, "2024-01", 8000.0, BillStatus::Unpaid, date(2024, 1, 11)),
                bill(3, "2024-03", 9000.0, BillStatus::Paid, date(2024, 3, 11)),
                bill(4, "2024-04", 8000.0, BillStatus::Unpaid, date(2024, 4, 11)),
            ],
            payments: vec![payment(1, 1, 4000.0, date(2024, 3, 6))],
            ..Default::default()
        };

        let report = aging_report(&snapshot, date(2024, 4, 1));
        assert_eq!(report.len(), 5);
        assert_eq!(report[0].bucket, AgingBucket::Current);
        assert_eq!(report[0].bills, 1);
        assert_eq!(report[1].bucket, AgingBucket::Days1To30);
        assert_eq!(report[1].amount, 3800.0);
        assert_eq!(report[3].bucket, AgingBucket::Days61To90);
        assert_eq!(report[3].bills, 1);
        assert_eq!(report[4].bills, 0);
    }
}
