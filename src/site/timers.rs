use super::*;

impl Site {
    pub(super) fn schedule(&mut self, delay_ms: i64, task: Task) -> i64 {
        let id = self.scheduler.schedule(delay_ms, task);
        self.trace.timer_line(format!(
            "[timer] schedule id={id} delay_ms={delay_ms} now_ms={}",
            self.scheduler.now_ms()
        ));
        id
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        let from = self.scheduler.now_ms();
        let to = self.scheduler.advance_clock(delta_ms)?;
        let ran = self.run_timer_queue(Some(to))?;
        self.trace.timer_line(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={to} ran_due={ran}"
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        let from = self.scheduler.now_ms();
        let to = self.scheduler.advance_clock_to(target_ms)?;
        let ran = self.run_timer_queue(Some(to))?;
        self.trace.timer_line(format!(
            "[timer] advance_to from={from} to={to} ran_due={ran}"
        ));
        Ok(())
    }

    /// Runs every pending timer, jumping the clock to each due time.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms();
        let ran = self.run_timer_queue(None)?;
        self.trace.timer_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.scheduler.now_ms()
        ));
        Ok(())
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let now = self.scheduler.now_ms();
        let ran = self.run_timer_queue(Some(now))?;
        self.trace
            .timer_line(format!("[timer] run_due now_ms={now} ran={ran}"));
        Ok(ran)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>) -> Result<usize> {
        let mut steps = 0usize;
        while self.scheduler.has_due(due_limit) {
            steps += 1;
            if steps > self.scheduler.timer_step_limit() {
                return Err(self.scheduler.step_limit_error(steps, due_limit));
            }
            let Some((timer, task)) = self.scheduler.pop_due(due_limit) else {
                break;
            };
            self.trace.timer_line(format!(
                "[timer] run id={} due_at={} now_ms={}",
                timer.id,
                timer.due_at,
                self.scheduler.now_ms()
            ));
            self.run_task(task)?;
        }
        Ok(steps)
    }

    fn run_task(&mut self, task: Task) -> Result<()> {
        match task {
            Task::HideErrorMessage => match self.error_banner {
                Some(banner) => banner.hide(&mut self.dom),
                None => Ok(()),
            },
            Task::SettlePayment { details, button } => {
                self.with_button_restored(button, |site| site.settle_payment(&details))
            }
            Task::FinishQuickBooking { button } => {
                self.with_button_restored(Some(button), Site::finish_quick_booking)
            }
            Task::FinishPasswordReset { button } => {
                self.with_button_restored(button, Site::finish_password_reset)
            }
        }
    }
}
