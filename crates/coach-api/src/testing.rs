//! In-memory gateway and mailer used by the handler and router tests.

use async_trait::async_trait;
use coach_core::{
    CheckoutOrder, CheckoutSession, MailError, MailResult, MailSender, OutgoingEmail,
    PaymentError, PaymentGateway, PaymentIntent, PaymentIntentRequest, PaymentResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct CheckoutCall {
    pub order: CheckoutOrder,
    pub success_url: String,
    pub cancel_url: String,
}

/// Records every call; answers with canned sessions/intents or a provider error.
#[derive(Default)]
pub struct FakeGateway {
    fail: bool,
    checkouts: Mutex<Vec<CheckoutCall>>,
    intents: Mutex<Vec<PaymentIntentRequest>>,
}

impl FakeGateway {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn checkouts(&self) -> Vec<CheckoutCall> {
        self.checkouts.lock().unwrap().clone()
    }

    pub fn intents(&self) -> Vec<PaymentIntentRequest> {
        self.intents.lock().unwrap().clone()
    }

    fn provider_error() -> PaymentError {
        PaymentError::ProviderError {
            provider: "fake".to_string(),
            message: "simulated outage".to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout(
        &self,
        order: &CheckoutOrder,
        success_url: &str,
        cancel_url: &str,
    ) -> PaymentResult<CheckoutSession> {
        let mut calls = self.checkouts.lock().unwrap();
        calls.push(CheckoutCall {
            order: order.clone(),
            success_url: success_url.to_string(),
            cancel_url: cancel_url.to_string(),
        });
        if self.fail {
            return Err(Self::provider_error());
        }
        let id = format!("cs_fake_{}", calls.len());
        let url = format!("https://checkout.stripe.com/c/pay/{}", id);
        Ok(CheckoutSession::new(id, order.id.clone(), "fake", url))
    }

    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> PaymentResult<PaymentIntent> {
        let mut calls = self.intents.lock().unwrap();
        calls.push(request.clone());
        if self.fail {
            return Err(Self::provider_error());
        }
        let id = format!("pi_fake_{}", calls.len());
        Ok(PaymentIntent {
            client_secret: format!("{}_secret", id),
            id,
            price: request.price.clone(),
            status: "requires_payment_method".to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Collects sent mail, or fails every send when built with `failing()`.
#[derive(Default)]
pub struct FakeMailer {
    fail: bool,
    attempts: AtomicUsize,
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl FakeMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> MailResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MailError::Transport("relay unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
