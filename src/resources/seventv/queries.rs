//! 7TV GraphQL documents.

pub const USER_SEARCH: &str = "IDbyUsername";
pub const USER_SEARCH_DOCUMENT: &str = r"
query IDbyUsername($query: String!) {
  users {
    search(query: $query) {
      items {
        id
        mainConnection { platformUsername }
      }
    }
  }
}
";

pub const USER_INFO: &str = "UserInfo";
pub const USER_INFO_DOCUMENT: &str = r"
query UserInfo($id: Id!) {
  users {
    user(id: $id) {
      inventory {
        badges { to { badge { id name description } } }
        paints { to { paint { name id } } }
      }
      roles { id name }
      connections { platform platformUsername platformDisplayName platformId linkedAt }
      editorFor {
        userId
        user { mainConnection { platformUsername platform } }
        addedAt
      }
    }
  }
}
";

pub const USER_ROLES: &str = "userRoles";
pub const USER_ROLES_DOCUMENT: &str = r"
query userRoles($id: Id!) {
  users {
    user(id: $id) {
      roles { id name }
    }
  }
}
";

pub const USER_SUBSCRIPTION: &str = "userSubscriptionQuery";
pub const USER_SUBSCRIPTION_DOCUMENT: &str = r#"
query userSubscriptionQuery($id: Id!) {
  users {
    user(id: $id) {
      id
      billing(productId: "01FEVKBBTGRAT7FCY276TNTJ4A") {
        subscriptionInfo {
          endDate
          totalDays
          activePeriod {
            autoRenew
            giftedById
            isTrial
            start
            end
            subscriptionProduct {
              name
              providerId
              defaultVariant { id kind paypalId price { amount currency } }
            }
            subscription {
              state
              createdAt
              endedAt
              id { productId userId }
            }
            subscriptionProductVariant { id kind paypalId price { amount currency } }
            giftedBy {
              mainConnection { platform platformId platformUsername platformDisplayName }
            }
            providerId { provider id }
            createdBy {
              ... on SubscriptionPeriodCreatedByRedeemCode { __typename redeemCodeId }
              ... on SubscriptionPeriodCreatedByInvoice { __typename invoiceId }
              ... on SubscriptionPeriodCreatedBySystem { reason }
            }
          }
        }
        badgeProgress {
          currentBadge { id name }
          nextBadge { percentage daysLeft badge { name id } }
        }
      }
    }
  }
}
"#;

pub const BADGES_AND_PAINTS: &str = "GetBadgesAndPaints";
pub const BADGES_AND_PAINTS_DOCUMENT: &str = r"
query GetBadgesAndPaints {
  badges { badges { name id description } }
  paints { paints { name id } }
}
";
